#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    if let Ok(endpoints) = reporting_api::parse_endpoints(data) {
        let serialized = reporting_api::marshal_endpoints(&endpoints).unwrap();

        let mut expected: Vec<_> = endpoints.into_iter().collect();
        expected.sort();
        let reparsed: Vec<_> = reporting_api::parse_endpoints(&serialized)
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(reparsed, expected);
    }
});
