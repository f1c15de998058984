#![no_main]

use libfuzzer_sys::fuzz_target;
use reporting_api::DeprecatedGroup;

fuzz_target!(|groups: Vec<DeprecatedGroup>| {
    let serialized = reporting_api::marshal_groups(&groups);
    assert_eq!(reporting_api::parse_groups(&serialized).unwrap(), groups);
});
