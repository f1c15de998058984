use crate::{
    marshal_groups, parse_groups, DeprecatedEndpoint, DeprecatedGroup, ErrorKind,
    GroupsSerializer, DEPRECATED_REPORT_TO_DEFAULT_MAX_AGE,
};

use std::error::Error as StdError;

#[test]
fn marshal_groups_wire_format() {
    let got = marshal_groups(&[
        DeprecatedGroup::new(
            "foo",
            "https://deprecated.empijei.science",
            ["https://other.empijei.science"],
        ),
        DeprecatedGroup::new("bar", "https://another.empijei.science", [""; 0]),
    ]);
    let want = r#"{"group":"foo","max_age":432000,"endpoints":[{"url":"https://deprecated.empijei.science"},{"url":"https://other.empijei.science"}]},{"group":"bar","max_age":432000,"endpoints":[{"url":"https://another.empijei.science"}]}"#;
    assert_eq!(want, got);
}

#[test]
fn marshal_groups_empty() {
    let groups: [DeprecatedGroup; 0] = [];
    assert_eq!("", marshal_groups(&groups));
}

#[test]
fn marshal_groups_keeps_caller_order() {
    let groups = [
        DeprecatedGroup::new("zz", "https://z", [""; 0]),
        DeprecatedGroup::new("aa", "https://a", [""; 0]),
    ];
    let got = marshal_groups(&groups);
    assert!(got.find(r#""zz""#) < got.find(r#""aa""#));
}

#[test]
fn marshal_groups_optional_fields() {
    let group = DeprecatedGroup {
        name: String::new(),
        include_subdomains: true,
        max_age_seconds: 0,
        endpoints: vec![
            DeprecatedEndpoint::new("https://a").with_priority(1),
            DeprecatedEndpoint::new("https://b").with_weight(3),
            DeprecatedEndpoint::new("https://c")
                .with_priority(2)
                .with_weight(5),
        ],
    };
    assert_eq!(
        r#"{"include_subdomains":true,"max_age":0,"endpoints":[{"url":"https://a","priority":1},{"url":"https://b","weight":3},{"url":"https://c","priority":2,"weight":5}]}"#,
        marshal_groups([&group])
    );
}

#[test]
fn marshal_groups_empty_endpoints() {
    let group = DeprecatedGroup::new("g", "https://a", [""; 0]);
    let group = DeprecatedGroup {
        endpoints: vec![],
        ..group
    };
    assert_eq!(
        r#"{"group":"g","max_age":432000,"endpoints":[]}"#,
        marshal_groups([&group])
    );
}

#[test]
fn marshal_groups_escapes_json() {
    let group = DeprecatedGroup::new("a\"b", "https://x/\u{1}", [""; 0]);
    assert_eq!(
        r#"{"group":"a\"b","max_age":432000,"endpoints":[{"url":"https://x/\u0001"}]}"#,
        marshal_groups([&group])
    );
}

#[test]
fn groups_serializer_with_buffer() {
    let mut output = String::from("Report-To: ");
    let mut ser = GroupsSerializer::with_buffer(&mut output);
    ser.group(&DeprecatedGroup::new("a", "https://a", [""; 0]))
        .group(&DeprecatedGroup::new("b", "https://b", [""; 0]));
    assert_eq!(
        r#"Report-To: {"group":"a","max_age":432000,"endpoints":[{"url":"https://a"}]},{"group":"b","max_age":432000,"endpoints":[{"url":"https://b"}]}"#,
        output
    );
}

// Pinned: the primary URL and the first additional URL share priority 0.
#[test]
fn new_group_priorities() {
    let group = DeprecatedGroup::new("foo", "https://a", ["https://b"]);
    assert_eq!(
        vec![
            DeprecatedEndpoint::new("https://a"),
            DeprecatedEndpoint::new("https://b"),
        ],
        group.endpoints
    );

    let group = DeprecatedGroup::new(
        "foo",
        "https://a",
        vec!["https://b".to_owned(), "https://c".to_owned(), "https://d".to_owned()],
    );
    let priorities: Vec<u64> = group.endpoints.iter().map(|e| e.priority).collect();
    assert_eq!(vec![0, 0, 1, 2], priorities);
    assert!(group.endpoints.iter().all(|e| e.weight == 0));
}

#[test]
fn new_group_defaults() {
    let group = DeprecatedGroup::new("foo", "https://a", [""; 0]);
    assert_eq!(432_000, DEPRECATED_REPORT_TO_DEFAULT_MAX_AGE);
    assert_eq!(DEPRECATED_REPORT_TO_DEFAULT_MAX_AGE, group.max_age_seconds);
    assert!(!group.include_subdomains);
    assert_eq!("foo", group.name);

    let group = group.with_max_age(0).with_include_subdomains(true);
    assert_eq!(0, group.max_age_seconds);
    assert!(group.include_subdomains);
}

#[test]
fn effective_name() {
    assert_eq!(
        "default",
        DeprecatedGroup::new("", "https://a", [""; 0]).effective_name()
    );
    assert_eq!(
        "csp",
        DeprecatedGroup::new("csp", "https://a", [""; 0]).effective_name()
    );
}

#[test]
fn parse_marshal_roundtrip() -> Result<(), Box<dyn StdError>> {
    let groups = vec![
        DeprecatedGroup::new("foo", "https://a", ["https://b", "https://c"]),
        DeprecatedGroup::new("", "https://d", [""; 0])
            .with_max_age(0)
            .with_include_subdomains(true),
        DeprecatedGroup {
            name: "weighted".to_owned(),
            include_subdomains: false,
            max_age_seconds: u64::MAX,
            endpoints: vec![DeprecatedEndpoint::new("https://e")
                .with_priority(u64::MAX)
                .with_weight(7)],
        },
    ];

    assert_eq!(groups, parse_groups(&marshal_groups(&groups))?);
    Ok(())
}

#[test]
fn parse_groups_empty() -> Result<(), Box<dyn StdError>> {
    assert!(parse_groups("")?.is_empty());
    assert!(parse_groups("  ")?.is_empty());
    Ok(())
}

#[test]
fn parse_groups_joined_header_lines() -> Result<(), Box<dyn StdError>> {
    let input = concat!(
        r#"{"group":"a","max_age":1,"endpoints":[{"url":"https://a"}]}"#,
        ", ",
        r#"{ "group": "b", "max_age": 2, "endpoints": [ { "url": "https://b", "priority": 3 } ] }"#,
    );
    let groups = parse_groups(input)?;
    assert_eq!(2, groups.len());
    assert_eq!("b", groups[1].name);
    assert_eq!(3, groups[1].endpoints[0].priority);
    Ok(())
}

#[test]
fn parse_groups_wide_priority_and_weight() -> Result<(), Box<dyn StdError>> {
    let input = r#"{"max_age":1,"endpoints":[{"url":"https://a","priority":4294967296,"weight":18446744073709551615}]}"#;
    let groups = parse_groups(input)?;
    assert_eq!(1, groups.len());
    assert_eq!(1 << 32, groups[0].endpoints[0].priority);
    assert_eq!(u64::MAX, groups[0].endpoints[0].weight);
    assert_eq!(input, marshal_groups(&groups));
    Ok(())
}

#[test]
fn parse_groups_skips_invalid_members() -> Result<(), Box<dyn StdError>> {
    let input = concat!(
        r#"{"group":"no-max-age","endpoints":[{"url":"https://a"}]},"#,
        r#"{"group":"no-endpoints","max_age":1},"#,
        r#"{"group":"negative","max_age":-1,"endpoints":[]},"#,
        r#"{"group":"bad-endpoint","max_age":1,"endpoints":[{"priority":1}]},"#,
        r#""not an object",42,null,"#,
        r#"{"group":"ok","max_age":1,"endpoints":[],"unknown":true}"#,
    );
    let groups = parse_groups(input)?;
    assert_eq!(1, groups.len());
    assert_eq!("ok", groups[0].name);
    Ok(())
}

#[test]
fn parse_groups_invalid_json() {
    for input in [
        "{",
        r#"{"max_age":1}}"#,
        "{},",
        r#"{"max_age":1,"endpoints":[]}] , [{}"#,
    ] {
        let err = parse_groups(input).unwrap_err();
        assert_eq!(ErrorKind::Json, err.kind(), "input {input:?}");
        assert!(err.to_string().starts_with("invalid JSON: "));
    }
}
