/*!
`reporting-api` is an implementation of the wire formats of the browser
[Reporting API]:

- the deprecated `Report-To` header, a comma-separated sequence of JSON
  objects describing named endpoint groups;
- the `Reporting-Endpoints` header, a [structured field] dictionary mapping
  endpoint names to URLs;
- the JSON payload of reports delivered by clients to a collection endpoint,
  including Content Security Policy violation reports.

All operations are pure: the crate neither sends headers nor stores reports,
and does not check that endpoint URLs are potentially trustworthy.

# Configuring endpoints

```
use reporting_api::{
    marshal_endpoints, marshal_groups, DeprecatedGroup, REPORTING_ENDPOINTS_HEADER,
    REPORT_TO_HEADER,
};
use std::collections::HashMap;

# fn main() -> Result<(), reporting_api::Error> {
let endpoints = HashMap::from([
    ("csp", "https://example.com/csp"),
    ("coep", "https://example.com/coep"),
]);

let header = marshal_endpoints(&endpoints)?;
assert_eq!(REPORTING_ENDPOINTS_HEADER, "Reporting-Endpoints");
assert_eq!(
    header,
    r#"coep="https://example.com/coep", csp="https://example.com/csp""#
);

// Older user agents only understand the deprecated header.
let legacy = marshal_groups(&[DeprecatedGroup::new(
    "csp",
    "https://example.com/csp",
    [""; 0],
)]);
assert_eq!(REPORT_TO_HEADER, "Report-To");
assert_eq!(
    legacy,
    r#"{"group":"csp","max_age":432000,"endpoints":[{"url":"https://example.com/csp"}]}"#
);
# Ok(())
# }
```

Endpoints are always emitted sorted by name, so equal maps produce equal
headers. An endpoint name or URL that cannot be represented in a structured
field yields an [`Error`] of kind [`ErrorKind::Encode`]; the header should
then not be sent at all.

# Receiving reports

```
use reporting_api::{parse_reports, CSP_REPORT_TYPE};

# fn main() -> Result<(), reporting_api::Error> {
let body = br#"[{
    "age": 27,
    "type": "csp-violation",
    "url": "https://example.com/",
    "user_agent": "Mozilla/5.0",
    "body": {"blockedURL": "inline", "disposition": "enforce"}
}]"#;

let reports = parse_reports(body)?;
assert_eq!(reports[0].report_type, CSP_REPORT_TYPE);
assert_eq!(reports[0].body["disposition"], "enforce");
# Ok(())
# }
```

Report bodies are kept as [`serde_json::Value`]s: recognizing and validating
them is up to the caller.

# Logging

The crate emits [`tracing`] events at `debug` and `trace` level when it
rejects or skips input. It never installs a subscriber.

[Reporting API]: <https://www.w3.org/TR/reporting/>
[structured field]: <https://httpwg.org/specs/rfc8941.html>
*/

mod error;
mod name;
mod parser;
mod report;
pub mod report_to;
mod serializer;
mod url;
mod utils;

#[cfg(test)]
mod test_parser;
#[cfg(test)]
mod test_report_to;

pub use error::{Error, ErrorKind};
pub use name::{name_ref, EndpointName, EndpointNameRef, NameError};
pub use parser::{parse_endpoints, Endpoints, Parser};
pub use report::{
    parse_csp_report, parse_reports, CspReport, CspReportDeprecated, CspReportEnvelope, Report,
    ReportsList, CSP_REPORT_CONTENT_TYPE, CSP_REPORT_TYPE, REPORTS_CONTENT_TYPE,
};
pub use report_to::{
    marshal_groups, parse_groups, DeprecatedEndpoint, DeprecatedGroup, GroupsSerializer,
    DEFAULT_GROUP_NAME, DEPRECATED_REPORT_TO_DEFAULT_MAX_AGE,
};
pub use serializer::{marshal_endpoints, EndpointsSerializer};
pub use url::{url_ref, EndpointUrl, EndpointUrlRef, UrlError};

/// The HTTP header key of the deprecated [`Report-To`] header.
///
/// [`Report-To`]: <https://www.w3.org/TR/2018/WD-reporting-1-20180925/#header>
pub const REPORT_TO_HEADER: &str = "Report-To";

/// The HTTP header key of the [`Reporting-Endpoints`] header.
///
/// [`Reporting-Endpoints`]: <https://www.w3.org/TR/reporting/#header>
pub const REPORTING_ENDPOINTS_HEADER: &str = "Reporting-Endpoints";

/// A result whose error type is [`Error`].
pub type ReportingResult<T> = Result<T, Error>;
