/*!
The deprecated `Report-To` header.

The header value is a comma-separated sequence of JSON objects, one per
[endpoint group]. The whole value is not itself valid JSON. Groups keep the
order chosen by the caller.

```
use reporting_api::{marshal_groups, DeprecatedGroup};

let groups = [
    DeprecatedGroup::new("csp", "https://example.com/csp", ["https://backup.example.com/csp"]),
    DeprecatedGroup::new("nel", "https://example.com/nel", [""; 0]).with_max_age(0),
];

assert_eq!(
    marshal_groups(&groups),
    concat!(
        r#"{"group":"csp","max_age":432000,"endpoints":[{"url":"https://example.com/csp"},{"url":"https://backup.example.com/csp"}]},"#,
        r#"{"group":"nel","max_age":0,"endpoints":[{"url":"https://example.com/nel"}]}"#,
    )
);
```

[endpoint group]: <https://www.w3.org/TR/2018/WD-reporting-1-20180925/#id-member>
*/

use crate::ReportingResult;

use serde::{Deserialize, Serialize};
use std::borrow::BorrowMut;

/// Default cache duration for endpoint groups: five days, in seconds.
pub const DEPRECATED_REPORT_TO_DEFAULT_MAX_AGE: u64 = 5 * 24 * 60 * 60;

/// The name user agents give to a group that has none.
pub const DEFAULT_GROUP_NAME: &str = "default";

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_zero(v: &u64) -> bool {
    *v == 0
}

/// An [endpoint] of a deprecated `Report-To` group.
///
/// [endpoint]: <https://www.w3.org/TR/2018/WD-reporting-1-20180925/#concept-endpoints>
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct DeprecatedEndpoint {
    /// The location of the endpoint.
    pub url: String,
    /// Forms failover classes.
    ///
    /// Backup collectors (higher values) only receive reports if all of the
    /// primary collectors (lower values) fail. Omitted on the wire when zero.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub priority: u64,
    /// Balances report traffic across a failover class. Omitted on the wire
    /// when zero.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub weight: u64,
}

impl DeprecatedEndpoint {
    /// Returns an endpoint with zero priority and weight.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            priority: 0,
            weight: 0,
        }
    }

    /// Sets the failover class of the endpoint.
    #[must_use]
    pub fn with_priority(mut self, priority: u64) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the share of traffic within the failover class.
    #[must_use]
    pub fn with_weight(mut self, weight: u64) -> Self {
        self.weight = weight;
        self
    }
}

/// An endpoint group of the deprecated `Report-To` header.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct DeprecatedGroup {
    /// The name of the group.
    ///
    /// Omitted on the wire when empty, in which case user agents call the
    /// group [`DEFAULT_GROUP_NAME`].
    #[serde(rename = "group", default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Enables the group for all subdomains of the current origin's host.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub include_subdomains: bool,
    /// The lifetime of the group, in seconds.
    ///
    /// Zero is meaningful: it removes the group from the user agent's
    /// reporting cache.
    #[serde(rename = "max_age")]
    pub max_age_seconds: u64,
    /// The endpoints that belong to this group.
    pub endpoints: Vec<DeprecatedEndpoint>,
}

impl DeprecatedGroup {
    /// Creates a group with [`DEPRECATED_REPORT_TO_DEFAULT_MAX_AGE`].
    ///
    /// `url` gets priority 0, and the `i`-th URL of `other_urls` gets
    /// priority `i`. Note that this puts `url` and the first of `other_urls`
    /// in the same failover class; use [`DeprecatedEndpoint::with_priority`]
    /// to build distinct classes.
    ///
    /// ```
    /// use reporting_api::DeprecatedGroup;
    ///
    /// let group = DeprecatedGroup::new("foo", "https://a", ["https://b", "https://c"]);
    ///
    /// let priorities: Vec<u64> = group.endpoints.iter().map(|e| e.priority).collect();
    /// assert_eq!(priorities, [0, 0, 1]);
    /// ```
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        other_urls: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        let mut endpoints = vec![DeprecatedEndpoint::new(url)];
        for (priority, url) in (0..).zip(other_urls) {
            endpoints.push(DeprecatedEndpoint::new(url).with_priority(priority));
        }

        Self {
            name: name.into(),
            include_subdomains: false,
            max_age_seconds: DEPRECATED_REPORT_TO_DEFAULT_MAX_AGE,
            endpoints,
        }
    }

    /// Sets the lifetime of the group. Zero evicts it.
    #[must_use]
    pub fn with_max_age(mut self, max_age_seconds: u64) -> Self {
        self.max_age_seconds = max_age_seconds;
        self
    }

    /// Sets whether the group also applies to subdomains.
    #[must_use]
    pub fn with_include_subdomains(mut self, include_subdomains: bool) -> Self {
        self.include_subdomains = include_subdomains;
        self
    }

    /// Returns the name user agents use for this group.
    #[must_use]
    pub fn effective_name(&self) -> &str {
        if self.name.is_empty() {
            DEFAULT_GROUP_NAME
        } else {
            &self.name
        }
    }
}

/// Serializes `Report-To` groups incrementally.
///
/// ```
/// use reporting_api::{DeprecatedGroup, GroupsSerializer};
///
/// let mut header = String::from("Report-To: ");
///
/// GroupsSerializer::with_buffer(&mut header)
///     .group(&DeprecatedGroup::new("", "https://example.com/r", [""; 0]));
///
/// assert_eq!(
///     header,
///     r#"Report-To: {"max_age":432000,"endpoints":[{"url":"https://example.com/r"}]}"#
/// );
/// ```
#[derive(Debug)]
pub struct GroupsSerializer<W> {
    buffer: W,
    first: bool,
}

impl Default for GroupsSerializer<String> {
    fn default() -> Self {
        Self::new()
    }
}

impl GroupsSerializer<String> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            first: true,
        }
    }
}

impl<'a> GroupsSerializer<&'a mut String> {
    pub fn with_buffer(buffer: &'a mut String) -> Self {
        Self {
            buffer,
            first: true,
        }
    }
}

impl<W: BorrowMut<String>> GroupsSerializer<W> {
    /// Appends the JSON object for `group`.
    ///
    /// # Panics
    ///
    /// Panics if `group` cannot be serialized to JSON, which would be a bug
    /// in this crate.
    pub fn group(&mut self, group: &DeprecatedGroup) -> &mut Self {
        let json = serde_json::to_string(group).expect("DeprecatedGroup is always serializable");

        let buffer = self.buffer.borrow_mut();
        if self.first {
            self.first = false;
        } else {
            buffer.push(',');
        }
        buffer.push_str(&json);
        self
    }

    /// Finishes serialization and returns the underlying output.
    #[must_use]
    pub fn finish(self) -> W {
        self.buffer
    }
}

/// Returns the value of a `Report-To` header for `groups`.
///
/// Groups are emitted in the given order. An empty input produces an empty
/// string, in which case the header should not be sent.
///
/// # Panics
///
/// See [`GroupsSerializer::group`].
#[must_use]
pub fn marshal_groups<'a>(groups: impl IntoIterator<Item = &'a DeprecatedGroup>) -> String {
    let mut ser = GroupsSerializer::new();
    for group in groups {
        ser.group(group);
    }
    ser.finish()
}

/// Parses the value of a `Report-To` header.
///
/// Several header lines may be joined with `,` beforehand. Members that are
/// not valid groups are skipped, as a user agent would do: for instance
/// objects without `max_age` or `endpoints`, or with negative numbers.
///
/// ```
/// # fn main() -> Result<(), reporting_api::Error> {
/// let groups = reporting_api::parse_groups(
///     r#"{"max_age":10,"endpoints":[{"url":"https://a"}]}, {"group":"broken"}"#,
/// )?;
///
/// assert_eq!(groups.len(), 1);
/// assert_eq!(groups[0].effective_name(), "default");
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns an error of kind [`ErrorKind::Json`][crate::ErrorKind::Json] if
/// the value is not a comma-separated sequence of JSON values.
pub fn parse_groups(input: &str) -> ReportingResult<Vec<DeprecatedGroup>> {
    // https://www.w3.org/TR/2018/WD-reporting-1-20180925/#process-header
    let members: Vec<serde_json::Value> = serde_json::from_str(&format!("[{input}]"))?;

    Ok(members
        .into_iter()
        .filter_map(|member| {
            serde_json::from_value::<DeprecatedGroup>(member)
                .inspect_err(|err| tracing::debug!(error = %err, "skipping Report-To member"))
                .ok()
        })
        .collect())
}
