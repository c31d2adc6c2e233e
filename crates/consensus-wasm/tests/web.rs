//! Browser-side checks of the JS bindings.

#![cfg(target_arch = "wasm32")]

use consensus_wasm::report::HeaderReport;
use consensus_wasm::{decode_compact, encode_compact, number_to_bool, HeaderValidator};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

const GENESIS_HEADER: &str = "0100000000000000000000000000000000000000000000000000000000000000000000003ba3edfd7a7b12b27ac72c3e67768f617fc81bc3888a51323a9fb8aa4b1e5e4a29ab5f49ffff001d1dac2b7c";

#[wasm_bindgen_test]
fn compact_round_trip() {
    let info = decode_compact(0x1d00ffff).unwrap();
    assert!(info.is_object());

    let bits = encode_compact("00000000ffff0000000000000000000000000000000000000000000000000000").unwrap();
    assert_eq!(bits, 0x1d00ffff);
}

#[wasm_bindgen_test]
fn strict_boolean_rejects_negative_zero() {
    assert_eq!(number_to_bool(&[0x80], false).unwrap(), false);
    assert!(number_to_bool(&[0x80], true).is_err());
}

#[wasm_bindgen_test]
fn validator_checks_genesis() {
    let validator = HeaderValidator::new("mainnet", false).unwrap();
    let report: HeaderReport =
        serde_wasm_bindgen::from_value(validator.check_header(GENESIS_HEADER).unwrap()).unwrap();

    assert!(report.valid_proof_of_work);
    assert_eq!(report.nonce, 2_083_236_893);
}

#[wasm_bindgen_test]
fn validator_reads_window_object() {
    let validator = HeaderValidator::new("regtest", false).unwrap();
    let window = serde_wasm_bindgen::to_value(&consensus_wasm::report::RetargetWindow {
        height: 2016,
        bits: vec![0x207fffff],
        timestamps: vec![1],
        ..Default::default()
    })
    .unwrap();

    assert_eq!(validator.next_required_bits(window).unwrap(), 0x207fffff);
    assert!(HeaderValidator::new("nowhere", false).is_err());
    assert!(validator.next_required_bits(JsValue::from_str("nope")).is_err());
}
