#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(reports) = reporting_api::parse_reports(data) {
        let serialized = serde_json::to_vec(&reports).unwrap();
        assert_eq!(reporting_api::parse_reports(&serialized).unwrap(), reports);
    }
    let _ = reporting_api::parse_csp_report(data);
});
