#![no_main]

use libfuzzer_sys::fuzz_target;
use reporting_api::{EndpointName, EndpointUrl};
use std::collections::BTreeMap;

fuzz_target!(|endpoints: Vec<(EndpointName, EndpointUrl)>| {
    let serialized =
        reporting_api::marshal_endpoints(endpoints.iter().map(|(name, url)| (name, url))).unwrap();

    // Later entries replace earlier ones with the same name.
    let expected: Vec<_> = endpoints
        .into_iter()
        .collect::<BTreeMap<_, _>>()
        .into_iter()
        .collect();
    let reparsed: Vec<_> = reporting_api::parse_endpoints(&serialized)
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(reparsed, expected);
});
