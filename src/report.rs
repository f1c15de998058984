use crate::ReportingResult;

use serde::{Deserialize, Deserializer, Serialize};

/// The [report type] of Content Security Policy violation reports.
///
/// [report type]: <https://www.w3.org/TR/CSP3/#reporting>
pub const CSP_REPORT_TYPE: &str = "csp-violation";

/// The media type of report lists delivered to Reporting API endpoints.
pub const REPORTS_CONTENT_TYPE: &str = "application/reports+json";

/// The media type of reports delivered through the deprecated CSP
/// `report-uri` directive.
pub const CSP_REPORT_CONTENT_TYPE: &str = "application/csp-report";

/// A [report] sent by a client.
///
/// Decoding applies no defaults beyond zero values: absent or `null` fields
/// stay empty, so the value reflects exactly what the client sent.
///
/// [report]: <https://www.w3.org/TR/reporting/#serialize-reports>
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ReceivedReport")]
pub struct Report {
    /// The number of milliseconds between the report's [timestamp] and the
    /// time it was sent.
    ///
    /// Serialized as `timestamp`. When decoding, `age` is read if
    /// `timestamp` is absent.
    ///
    /// [timestamp]: <https://www.w3.org/TR/reporting/#report-timestamp>
    #[serde(rename = "timestamp")]
    pub age: i64,
    /// The [report type], which determines the shape of `body`.
    ///
    /// [report type]: <https://www.w3.org/TR/reporting/#report-type>
    #[serde(rename = "type")]
    pub report_type: String,
    /// Typically the address of the document or worker that generated the
    /// report.
    pub url: String,
    /// The `User-Agent` header of the request the report was generated from.
    pub user_agent: String,
    /// The report body, left uninterpreted.
    ///
    /// Use `report_type` to pick a type to deserialize it into, e.g. with
    /// [`serde_json::from_value`].
    pub body: serde_json::Value,
}

// Wire shape of a report. Both age keys are read so that a report carrying
// both is not a duplicate field.
#[derive(Deserialize)]
struct ReceivedReport {
    timestamp: Option<i64>,
    age: Option<i64>,
    #[serde(rename = "type")]
    report_type: Option<String>,
    url: Option<String>,
    user_agent: Option<String>,
    #[serde(default)]
    body: serde_json::Value,
}

impl From<ReceivedReport> for Report {
    fn from(report: ReceivedReport) -> Self {
        Self {
            age: report.timestamp.or(report.age).unwrap_or_default(),
            report_type: report.report_type.unwrap_or_default(),
            url: report.url.unwrap_or_default(),
            user_agent: report.user_agent.unwrap_or_default(),
            body: report.body,
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The reports delivered in a single request.
pub type ReportsList = Vec<Report>;

/// Decodes the body of a request sent to a Reporting API endpoint.
///
/// Reports with an unknown type or an unexpected body shape are kept as-is.
///
/// ```
/// # fn main() -> Result<(), reporting_api::Error> {
/// let reports = reporting_api::parse_reports(
///     br#"[{"age":10,"type":"intervention","url":"https://example.com/","body":[1,2]}]"#,
/// )?;
///
/// assert_eq!(reports[0].age, 10);
/// assert_eq!(reports[0].report_type, "intervention");
/// assert_eq!(reports[0].body, serde_json::json!([1, 2]));
/// assert_eq!(reports[0].user_agent, "");
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns an error of kind [`ErrorKind::Json`][crate::ErrorKind::Json] if
/// the body is not a JSON array of objects.
pub fn parse_reports(input: &[u8]) -> ReportingResult<ReportsList> {
    Ok(serde_json::from_slice(input)?)
}

/// A CSP violation report in the [deprecated serialization].
///
/// Fields mirror the serialization verbatim and are not validated. `null`
/// values decode as empty.
///
/// [deprecated serialization]: <https://www.w3.org/TR/CSP3/#deprecated-serialize-violation>
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CspReportDeprecated {
    #[serde(deserialize_with = "null_as_default")]
    pub document_uri: String,
    #[serde(deserialize_with = "null_as_default")]
    pub referrer: String,
    #[serde(deserialize_with = "null_as_default")]
    pub blocked_uri: String,
    #[serde(deserialize_with = "null_as_default")]
    pub effective_directive: String,
    #[serde(deserialize_with = "null_as_default")]
    pub violated_directive: String,
    #[serde(deserialize_with = "null_as_default")]
    pub original_policy: String,
    #[serde(deserialize_with = "null_as_default")]
    pub disposition: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status_code: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub script_sample: String,
}

/// The request body of an `application/csp-report` delivery.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CspReportEnvelope {
    #[serde(rename = "csp-report")]
    pub csp_report: CspReportDeprecated,
}

/// Decodes the body of a request sent to a CSP `report-uri` endpoint.
///
/// ```
/// # fn main() -> Result<(), reporting_api::Error> {
/// let report = reporting_api::parse_csp_report(
///     br#"{"csp-report":{"document-uri":"https://example.com/","blocked-uri":"inline","status-code":200}}"#,
/// )?;
///
/// assert_eq!(report.blocked_uri, "inline");
/// assert_eq!(report.status_code, 200);
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns an error of kind [`ErrorKind::Json`][crate::ErrorKind::Json] if
/// the body is not an object with a `csp-report` member.
pub fn parse_csp_report(input: &[u8]) -> ReportingResult<CspReportDeprecated> {
    let envelope: CspReportEnvelope = serde_json::from_slice(input)?;
    Ok(envelope.csp_report)
}

/// A CSP violation report in the current [serialization].
///
/// The shape of this body is not settled yet, so this type has no fields and
/// cannot be decoded into:
///
/// ```compile_fail
/// let _: reporting_api::CspReport = serde_json::from_str("{}").unwrap();
/// ```
///
/// Decode the [`Report::body`] of a [`CSP_REPORT_TYPE`] report as a
/// [`serde_json::Value`] instead.
///
/// [serialization]: <https://www.w3.org/TR/CSP3/#reporting>
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub struct CspReport {}
