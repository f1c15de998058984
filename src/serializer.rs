use crate::{EndpointNameRef, EndpointUrlRef, ReportingResult};

use std::borrow::BorrowMut;

/// Serializes a `Reporting-Endpoints` dictionary incrementally.
///
/// Entries are written in the order they are added; use
/// [`marshal_endpoints`] to get a deterministic, name-sorted header from an
/// unordered map.
///
/// ```
/// use reporting_api::{name_ref, url_ref, EndpointsSerializer};
///
/// let mut ser = EndpointsSerializer::new();
/// ser.endpoint(name_ref("csp"), url_ref("https://example.com/csp"))
///     .endpoint(name_ref("coep"), url_ref("https://example.com/coep"));
///
/// assert_eq!(
///     ser.finish(),
///     r#"csp="https://example.com/csp", coep="https://example.com/coep""#
/// );
/// ```
// https://httpwg.org/specs/rfc8941.html#ser-dictionary
#[derive(Debug)]
pub struct EndpointsSerializer<W> {
    buffer: W,
    first: bool,
}

impl Default for EndpointsSerializer<String> {
    fn default() -> Self {
        Self::new()
    }
}

impl EndpointsSerializer<String> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            first: true,
        }
    }
}

impl<'a> EndpointsSerializer<&'a mut String> {
    pub fn with_buffer(buffer: &'a mut String) -> Self {
        Self {
            buffer,
            first: true,
        }
    }
}

impl<W: BorrowMut<String>> EndpointsSerializer<W> {
    /// Appends a `name="url"` member.
    pub fn endpoint(&mut self, name: &EndpointNameRef, url: &EndpointUrlRef) -> &mut Self {
        let buffer = self.buffer.borrow_mut();
        if self.first {
            self.first = false;
        } else {
            buffer.push_str(", ");
        }
        serialize_name(name, buffer);
        buffer.push('=');
        serialize_url(url, buffer);
        self
    }

    /// Finishes serialization and returns the underlying output.
    ///
    /// Unlike general structured-field dictionaries, an empty endpoint set is
    /// not an error: the output is simply empty, and callers should not emit
    /// the header.
    #[must_use]
    pub fn finish(self) -> W {
        self.buffer
    }
}

pub(crate) fn serialize_name(name: &EndpointNameRef, output: &mut String) {
    // https://httpwg.org/specs/rfc8941.html#ser-key
    output.push_str(name.as_str());
}

pub(crate) fn serialize_url(url: &EndpointUrlRef, output: &mut String) {
    // https://httpwg.org/specs/rfc8941.html#ser-string

    output.push('"');
    for c in url.as_str().chars() {
        if c == '\\' || c == '"' {
            output.push('\\');
        }
        output.push(c);
    }
    output.push('"');
}

/// Serializes endpoints into the value of a `Reporting-Endpoints` header.
///
/// Names are used as endpoint names and values as endpoint URLs. Entries are
/// sorted by name, comparing bytes, so the output only depends on the logical
/// content of `endpoints`. When a name occurs more than once, the last
/// occurrence wins.
///
/// URLs must be [potentially trustworthy]: user agents ignore non-secure
/// endpoints. This is not checked here.
///
/// ```
/// use std::collections::HashMap;
///
/// # fn main() -> Result<(), reporting_api::Error> {
/// let endpoints = HashMap::from([
///     ("foo", "https://a.example"),
///     ("bar", "https://b.example"),
/// ]);
///
/// assert_eq!(
///     reporting_api::marshal_endpoints(endpoints)?,
///     r#"bar="https://b.example", foo="https://a.example""#
/// );
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns an error of kind [`ErrorKind::Encode`][crate::ErrorKind::Encode]
/// when a name is not a valid structured-field key or a URL is not a valid
/// structured-field string. No partial output is produced.
///
/// [potentially trustworthy]: <https://w3c.github.io/webappsec-secure-contexts/#is-origin-trustworthy>
pub fn marshal_endpoints<K, V>(
    endpoints: impl IntoIterator<Item = (K, V)>,
) -> ReportingResult<String>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut entries: Vec<(K, V)> = endpoints.into_iter().collect();
    // Stable, so duplicate names keep their relative order.
    entries.sort_by(|(a, _), (b, _)| a.as_ref().cmp(b.as_ref()));

    let mut ser = EndpointsSerializer::new();
    for (idx, (name, url)) in entries.iter().enumerate() {
        let name = name.as_ref();
        if entries
            .get(idx + 1)
            .is_some_and(|(next, _)| next.as_ref() == name)
        {
            continue;
        }

        let valid_name = EndpointNameRef::from_str(name).inspect_err(|err| {
            tracing::debug!(endpoint = name, error = %err, "rejecting Reporting-Endpoints entry");
        })?;
        let valid_url = EndpointUrlRef::from_str(url.as_ref()).inspect_err(|err| {
            tracing::debug!(endpoint = name, error = %err, "rejecting Reporting-Endpoints entry");
        })?;
        ser.endpoint(valid_name, valid_url);
    }
    Ok(ser.finish())
}
