use crate::error::{Error, Repr};
use crate::utils;

use std::borrow::Borrow;
use std::convert::TryFrom;
use std::fmt;

/// An owned endpoint URL, as used in a `Reporting-Endpoints` header.
///
/// Endpoint URLs are serialized as structured field value [strings], so they
/// may only contain printable ASCII characters (i.e. the range
/// `0x20 ..= 0x7e`). Non-ASCII URLs must be percent-encoded first.
///
/// No check is made that the URL is well-formed or potentially trustworthy:
/// user agents ignore endpoints that are not.
///
/// [strings]: <https://httpwg.org/specs/rfc8941.html#string>
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EndpointUrl(pub(crate) String);

/// A borrowed endpoint URL.
///
/// This type is to [`EndpointUrl`] as [`str`] is to [`String`].
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, ref_cast::RefCastCustom)]
#[repr(transparent)]
pub struct EndpointUrlRef(str);

/// An error produced during conversion to an endpoint URL.
#[derive(Debug)]
pub struct UrlError {
    byte_index: usize,
}

impl fmt::Display for UrlError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "invalid character for endpoint URL at byte index {}",
            self.byte_index
        )
    }
}

impl std::error::Error for UrlError {}

impl From<UrlError> for Error {
    fn from(err: UrlError) -> Self {
        Repr::InvalidUrlCharacter(err.byte_index).into()
    }
}

const fn validate(v: &[u8]) -> Result<(), UrlError> {
    let mut index = 0;

    while index < v.len() {
        if !utils::is_allowed_string_char(v[index]) {
            return Err(UrlError { byte_index: index });
        }
        index += 1;
    }

    Ok(())
}

impl EndpointUrlRef {
    #[ref_cast::ref_cast_custom]
    const fn cast(v: &str) -> &Self;

    /// Creates a `&EndpointUrlRef` from a `&str`.
    ///
    /// # Errors
    ///
    /// Returns an error if `v` contains a character outside of printable
    /// ASCII.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(v: &str) -> Result<&Self, UrlError> {
        validate(v.as_bytes())?;
        Ok(Self::cast(v))
    }

    /// Creates a `&EndpointUrlRef`, panicking if the value is invalid.
    ///
    /// This method is intended to be called from `const` contexts in which the
    /// value is known to be valid. Use [`EndpointUrlRef::from_str`] for
    /// non-panicking conversions.
    ///
    /// # Panics
    ///
    /// Panics if `v` contains a character outside of printable ASCII.
    #[must_use]
    pub const fn constant(v: &str) -> &Self {
        match validate(v.as_bytes()) {
            Ok(()) => Self::cast(v),
            Err(_) => panic!("invalid character for endpoint URL"),
        }
    }

    /// Returns the URL as a `&str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ToOwned for EndpointUrlRef {
    type Owned = EndpointUrl;

    fn to_owned(&self) -> EndpointUrl {
        EndpointUrl(self.0.to_owned())
    }

    fn clone_into(&self, target: &mut EndpointUrl) {
        self.0.clone_into(&mut target.0);
    }
}

impl Borrow<EndpointUrlRef> for EndpointUrl {
    fn borrow(&self) -> &EndpointUrlRef {
        self
    }
}

impl std::ops::Deref for EndpointUrl {
    type Target = EndpointUrlRef;

    fn deref(&self) -> &EndpointUrlRef {
        EndpointUrlRef::cast(&self.0)
    }
}

impl From<EndpointUrl> for String {
    fn from(v: EndpointUrl) -> String {
        v.0
    }
}

impl TryFrom<String> for EndpointUrl {
    type Error = UrlError;

    fn try_from(v: String) -> Result<EndpointUrl, UrlError> {
        validate(v.as_bytes())?;
        Ok(EndpointUrl(v))
    }
}

impl EndpointUrl {
    /// Creates an `EndpointUrl` from a `String`.
    ///
    /// Returns the original value if the conversion failed.
    ///
    /// # Errors
    ///
    /// Returns an error if `v` contains a character outside of printable
    /// ASCII.
    pub fn from_string(v: String) -> Result<Self, (UrlError, String)> {
        match validate(v.as_bytes()) {
            Ok(()) => Ok(Self(v)),
            Err(err) => Err((err, v)),
        }
    }
}

/// Creates a `&EndpointUrlRef`, panicking if the value is invalid.
///
/// This is a convenience free function for [`EndpointUrlRef::constant`].
///
/// # Panics
///
/// Panics if `v` contains a character outside of printable ASCII.
#[must_use]
pub const fn url_ref(v: &str) -> &EndpointUrlRef {
    EndpointUrlRef::constant(v)
}

impl fmt::Display for EndpointUrlRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self.as_str(), f)
    }
}

impl fmt::Display for EndpointUrl {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        <EndpointUrlRef as fmt::Display>::fmt(self, f)
    }
}

impl PartialEq<EndpointUrlRef> for EndpointUrl {
    fn eq(&self, other: &EndpointUrlRef) -> bool {
        <EndpointUrlRef as PartialEq>::eq(self, other)
    }
}

impl PartialEq<EndpointUrl> for EndpointUrlRef {
    fn eq(&self, other: &EndpointUrl) -> bool {
        <EndpointUrlRef as PartialEq>::eq(self, other)
    }
}

impl PartialEq<str> for EndpointUrl {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for EndpointUrl {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl<'a> TryFrom<&'a str> for &'a EndpointUrlRef {
    type Error = UrlError;

    fn try_from(v: &'a str) -> Result<&'a EndpointUrlRef, UrlError> {
        EndpointUrlRef::from_str(v)
    }
}

impl Borrow<str> for EndpointUrl {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl AsRef<str> for EndpointUrl {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl AsRef<str> for EndpointUrlRef {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(feature = "arbitrary")]
impl<'a> arbitrary::Arbitrary<'a> for EndpointUrl {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        EndpointUrlRef::from_str(<&str>::arbitrary(u)?)
            .map(ToOwned::to_owned)
            .map_err(|_| arbitrary::Error::IncorrectFormat)
    }
}
