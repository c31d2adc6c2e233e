//! Header validation and retargeting controller exposed to JavaScript.

use consensus_core::retarget::{bits_count, retarget_height, timestamp_count};
use consensus_core::{next_required_bits, BlockHeader, Forks, Network, Settings};
use wasm_bindgen::prelude::*;

use crate::report::{to_js, HeaderReport, RetargetWindow, WindowRequirements};

/// Network rules bound to a validator instance.
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct HeaderValidator {
    network: Network,
    settings: Settings,
    forks: Forks,
}

impl HeaderValidator {
    pub fn for_network(network: Network) -> Self {
        HeaderValidator {
            network,
            settings: network.settings(),
            forks: network.forks(),
        }
    }

    /// Override settings and forks from JSON; omitted fields keep the
    /// network's defaults.
    pub fn with_config(network: Network, settings_json: &str, forks_json: &str) -> Result<Self, String> {
        let mut validator = Self::for_network(network);

        if !settings_json.trim().is_empty() {
            validator.settings = serde_json::from_str(settings_json)
                .map_err(|e| format!("Invalid settings: {}", e))?;
        }
        if !forks_json.trim().is_empty() {
            validator.forks = serde_json::from_str(forks_json)
                .map_err(|e| format!("Invalid forks: {}", e))?;
        }

        Ok(validator)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn forks(&self) -> &Forks {
        &self.forks
    }

    pub fn required_bits(&self, window: &RetargetWindow) -> u32 {
        let bits = next_required_bits(&window.context(), &self.forks, &self.settings);
        log::debug!(
            "{} requires {:#010x} at height {}",
            self.network,
            bits,
            window.height
        );
        bits
    }

    pub fn report(&self, header_bytes: &[u8]) -> Result<HeaderReport, String> {
        let header = BlockHeader::from_bytes(header_bytes).map_err(|e| e.to_string())?;
        Ok(HeaderReport::new(&header, self.settings.proof_of_work_limit))
    }

    pub fn requirements(&self, height: usize) -> WindowRequirements {
        let interval = self.settings.retargeting_interval();
        WindowRequirements {
            bits_count: bits_count(height, &self.forks, interval),
            timestamp_count: timestamp_count(height),
            retarget_height: retarget_height(height, &self.forks, interval),
        }
    }
}

#[wasm_bindgen]
impl HeaderValidator {
    /// Create a validator for a named network.
    ///
    /// # Arguments
    /// * `network` - "mainnet", "testnet" or "regtest"
    /// * `overflow_patch` - Use the patched retarget arithmetic
    #[wasm_bindgen(constructor)]
    pub fn new(network: &str, overflow_patch: bool) -> Result<HeaderValidator, JsValue> {
        let network: Network = network
            .parse()
            .map_err(|_| JsValue::from_str("Invalid network"))?;

        let mut validator = Self::for_network(network);
        validator.forks.retarget_overflow_patch = overflow_patch;
        Ok(validator)
    }

    /// Create a validator with JSON overrides for settings and forks.
    #[wasm_bindgen(js_name = fromConfig)]
    pub fn from_config(network: &str, settings_json: &str, forks_json: &str) -> Result<HeaderValidator, JsValue> {
        let network: Network = network
            .parse()
            .map_err(|_| JsValue::from_str("Invalid network"))?;

        Self::with_config(network, settings_json, forks_json).map_err(|e| JsValue::from_str(&e))
    }

    /// Compact bits required of the next header.
    ///
    /// `window` is an object with `height`, `bits`, `timestamps`,
    /// `retarget_timestamp` and `timestamp`.
    #[wasm_bindgen]
    pub fn next_required_bits(&self, window: JsValue) -> Result<u32, JsValue> {
        let window: RetargetWindow = serde_wasm_bindgen::from_value(window)
            .map_err(|e| JsValue::from_str(&format!("Invalid window: {}", e)))?;

        Ok(self.required_bits(&window))
    }

    /// Decode an 80-byte header from hex and check its proof of work.
    #[wasm_bindgen]
    pub fn check_header(&self, header_hex: &str) -> Result<JsValue, JsValue> {
        let bytes = hex::decode(header_hex.trim())
            .map_err(|_| JsValue::from_str("Invalid header hex"))?;

        let report = self.report(&bytes).map_err(|e| JsValue::from_str(&e))?;
        to_js(&report)
    }

    /// History the window for `height` must carry.
    #[wasm_bindgen]
    pub fn window_requirements(&self, height: usize) -> Result<JsValue, JsValue> {
        to_js(&self.requirements(height))
    }

    /// Get the current network.
    #[wasm_bindgen(getter)]
    pub fn network(&self) -> String {
        self.network.name().to_string()
    }

    /// Proof-of-work ceiling in compact form.
    #[wasm_bindgen(getter)]
    pub fn proof_of_work_limit(&self) -> u32 {
        self.settings.proof_of_work_limit
    }
}
