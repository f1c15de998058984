use crate::{marshal_endpoints, parse_endpoints, ErrorKind, Parser};

use std::collections::BTreeMap;
use std::error::Error as StdError;

fn pairs(input: &str) -> Result<Vec<(String, String)>, Box<dyn StdError>> {
    Ok(parse_endpoints(input)?
        .into_iter()
        .map(|(name, url)| (name.into(), url.into()))
        .collect())
}

fn parse_error(input: &str) -> String {
    let err = parse_endpoints(input).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse, "input {input:?}");
    err.to_string()
}

#[test]
fn parse() -> Result<(), Box<dyn StdError>> {
    let input = r#"csp="https://example.com/csp", coep="https://example.com/coep""#;
    assert_eq!(
        vec![
            ("csp".to_owned(), "https://example.com/csp".to_owned()),
            ("coep".to_owned(), "https://example.com/coep".to_owned()),
        ],
        pairs(input)?
    );
    Ok(())
}

#[test]
fn parse_keeps_header_order() -> Result<(), Box<dyn StdError>> {
    let endpoints = parse_endpoints(r#"z="1", a="2", m="3""#)?;
    let names: Vec<&str> = endpoints.keys().map(|name| name.as_str()).collect();
    assert_eq!(names, ["z", "a", "m"]);
    Ok(())
}

#[test]
fn parse_empty() -> Result<(), Box<dyn StdError>> {
    assert!(parse_endpoints("")?.is_empty());
    assert!(parse_endpoints("   ")?.is_empty());
    Ok(())
}

#[test]
fn parse_whitespace() -> Result<(), Box<dyn StdError>> {
    let input = "  a=\"1\" \t,\t  b=\"2\"  ";
    assert_eq!(
        vec![
            ("a".to_owned(), "1".to_owned()),
            ("b".to_owned(), "2".to_owned())
        ],
        pairs(input)?
    );
    Ok(())
}

#[test]
fn parse_escaped_string() -> Result<(), Box<dyn StdError>> {
    assert_eq!(
        vec![("q".to_owned(), r#"https://a.example/"x"\y"#.to_owned())],
        pairs(r#"q="https://a.example/\"x\"\\y""#)?
    );
    Ok(())
}

#[test]
fn parse_ignores_non_string_members() -> Result<(), Box<dyn StdError>> {
    let input = concat!(
        r#"bool=?1, flag, token=https, int=-42, dec=1.5, "#,
        r#"bytes=:aGVsbG8=:, list=("https://a.example" 1), "#,
        r#"kept="https://kept.example""#,
    );
    assert_eq!(
        vec![("kept".to_owned(), "https://kept.example".to_owned())],
        pairs(input)?
    );
    Ok(())
}

#[test]
fn parse_ignores_parameters() -> Result<(), Box<dyn StdError>> {
    let input = r#"a="https://a.example";priority=1;backup, b="https://b.example";  x="y""#;
    assert_eq!(
        vec![
            ("a".to_owned(), "https://a.example".to_owned()),
            ("b".to_owned(), "https://b.example".to_owned())
        ],
        pairs(input)?
    );
    Ok(())
}

#[test]
fn parse_duplicate_keys() -> Result<(), Box<dyn StdError>> {
    // The last value wins, at the position of the first occurrence.
    assert_eq!(
        vec![
            ("a".to_owned(), "3".to_owned()),
            ("b".to_owned(), "2".to_owned())
        ],
        pairs(r#"a="1", b="2", a="3""#)?
    );

    // A later non-string value removes the endpoint.
    assert_eq!(
        vec![("b".to_owned(), "2".to_owned())],
        pairs(r#"a="1", b="2", a=3"#)?
    );
    Ok(())
}

#[test]
fn parse_errors() {
    assert_eq!(
        parse_error(r#"a="1","#),
        "trailing comma at index 5"
    );
    assert_eq!(
        parse_error(r#"a="1" b="2""#),
        "trailing characters after member at index 6"
    );
    assert_eq!(
        parse_error(r#"A="1""#),
        "expected start of key ('a'-'z' or '*') at index 0"
    );
    assert_eq!(
        parse_error(r#"a="unterminated"#),
        "unterminated string at index 15"
    );
    assert_eq!(
        parse_error("a=\"caf\u{e9}\""),
        "invalid string character at index 6"
    );
    assert_eq!(
        parse_error(r#"a="\x""#),
        "invalid escape sequence at index 4"
    );
    assert_eq!(
        parse_error(r#"a="\"#),
        "unterminated escape sequence at index 4"
    );
    assert_eq!(parse_error("a="), "expected start of bare item at index 2");
    assert_eq!(parse_error("a=?2"), "expected boolean ('0' or '1') at index 3");
    assert_eq!(parse_error("a=:abc"), "unterminated byte sequence at index 6");
    assert_eq!(parse_error("a=:aGVsb G8=:"), "invalid byte sequence at index 8");
    assert_eq!(parse_error("a=-x"), "expected digit at index 3");
    assert_eq!(parse_error("a=1234567890123456"), "too many digits at index 17");
    assert_eq!(
        parse_error("a=1234567890123.1"),
        "too many digits before decimal point at index 15"
    );
    assert_eq!(
        parse_error("a=1.1234"),
        "too many digits after decimal point at index 7"
    );
    assert_eq!(parse_error("a=1."), "trailing decimal point at index 3");
    assert_eq!(
        parse_error("a=(1 2"),
        "unterminated inner list at index 6"
    );
    assert_eq!(
        parse_error("a=(1,2)"),
        "expected inner list delimiter (' ' or ')') at index 4"
    );
}

#[test]
fn parse_error_rejects_whole_header() {
    // A syntax error anywhere invalidates every endpoint.
    assert!(parse_endpoints(r#"good="https://ok.example", bad=@"#).is_err());
}

#[test]
fn parser_stops_at_first_error() {
    let mut parser = Parser::new(r#"a="1" ;"#);
    assert!(parser.parse_dictionary().is_err());
    assert_eq!(parser.remaining(), b";");
}

#[test]
fn parse_marshal_roundtrip() -> Result<(), Box<dyn StdError>> {
    let endpoints = BTreeMap::from([
        ("default", "https://example.com/reports"),
        ("csp-endpoint", r#"https://example.com/csp?q="x"&r=\"#),
        ("*", ""),
    ]);

    let header = marshal_endpoints(&endpoints)?;
    let parsed = parse_endpoints(&header)?;

    let roundtrip: Vec<(&str, &str)> = parsed
        .iter()
        .map(|(name, url)| (name.as_str(), url.as_str()))
        .collect();
    let expected: Vec<(&str, &str)> = endpoints.into_iter().collect();
    assert_eq!(expected, roundtrip);
    Ok(())
}
