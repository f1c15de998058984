use crate::error::{Error, Repr};
use crate::utils;

use std::borrow::Borrow;
use std::convert::TryFrom;
use std::fmt;

/// An owned endpoint name, as used in a `Reporting-Endpoints` header.
///
/// Endpoint names are structured field value [keys] and must match the
/// following regular expression:
///
/// ```re
/// ^[a-z*][a-z0-9_\-.*]*$
/// ```
///
/// [keys]: <https://httpwg.org/specs/rfc8941.html#key>
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EndpointName(String);

/// A borrowed endpoint name, as used in a `Reporting-Endpoints` header.
///
/// This type is to [`EndpointName`] as [`str`] is to [`String`].
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, ref_cast::RefCastCustom)]
#[repr(transparent)]
pub struct EndpointNameRef(str);

/// An error produced during conversion to an endpoint name.
#[derive(Debug)]
pub struct NameError {
    byte_index: Option<usize>,
}

impl fmt::Display for NameError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(byte_index) = self.byte_index {
            write!(
                f,
                "invalid character for endpoint name at byte index {byte_index}"
            )
        } else {
            f.write_str("endpoint name cannot be empty")
        }
    }
}

impl std::error::Error for NameError {}

impl From<NameError> for Error {
    fn from(err: NameError) -> Self {
        match err.byte_index {
            None => Repr::EmptyName,
            Some(index) => Repr::InvalidNameCharacter(index),
        }
        .into()
    }
}

const fn validate(v: &[u8]) -> Result<(), NameError> {
    if v.is_empty() {
        return Err(NameError { byte_index: None });
    }

    if !utils::is_allowed_start_key_char(v[0]) {
        return Err(NameError {
            byte_index: Some(0),
        });
    }

    let mut index = 1;

    while index < v.len() {
        if !utils::is_allowed_inner_key_char(v[index]) {
            return Err(NameError {
                byte_index: Some(index),
            });
        }
        index += 1;
    }

    Ok(())
}

impl EndpointNameRef {
    #[ref_cast::ref_cast_custom]
    pub(crate) const fn cast(v: &str) -> &Self;

    /// Creates a `&EndpointNameRef` from a `&str`.
    ///
    /// # Errors
    ///
    /// Returns an error if `v` is empty or contains a character that is not
    /// allowed in a structured field key.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(v: &str) -> Result<&Self, NameError> {
        validate(v.as_bytes())?;
        Ok(Self::cast(v))
    }

    /// Creates a `&EndpointNameRef`, panicking if the value is invalid.
    ///
    /// This method is intended to be called from `const` contexts in which the
    /// value is known to be valid. Use [`EndpointNameRef::from_str`] for
    /// non-panicking conversions.
    ///
    /// # Panics
    ///
    /// Panics if `v` is not a valid endpoint name.
    #[must_use]
    pub const fn constant(v: &str) -> &Self {
        match validate(v.as_bytes()) {
            Ok(()) => Self::cast(v),
            Err(err) => {
                if err.byte_index.is_none() {
                    panic!("endpoint name cannot be empty")
                } else {
                    panic!("invalid character for endpoint name")
                }
            }
        }
    }

    /// Returns the name as a `&str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ToOwned for EndpointNameRef {
    type Owned = EndpointName;

    fn to_owned(&self) -> EndpointName {
        EndpointName(self.0.to_owned())
    }
}

impl Borrow<EndpointNameRef> for EndpointName {
    fn borrow(&self) -> &EndpointNameRef {
        self
    }
}

impl std::ops::Deref for EndpointName {
    type Target = EndpointNameRef;

    fn deref(&self) -> &EndpointNameRef {
        EndpointNameRef::cast(&self.0)
    }
}

impl From<EndpointName> for String {
    fn from(v: EndpointName) -> String {
        v.0
    }
}

impl TryFrom<String> for EndpointName {
    type Error = NameError;

    fn try_from(v: String) -> Result<EndpointName, NameError> {
        validate(v.as_bytes())?;
        Ok(EndpointName(v))
    }
}

impl EndpointName {
    /// Creates an `EndpointName` from a `String`.
    ///
    /// Returns the original value if the conversion failed.
    ///
    /// # Errors
    ///
    /// Returns an error if `v` is not a valid endpoint name.
    pub fn from_string(v: String) -> Result<Self, (NameError, String)> {
        match validate(v.as_bytes()) {
            Ok(()) => Ok(Self(v)),
            Err(err) => Err((err, v)),
        }
    }
}

/// Creates a `&EndpointNameRef`, panicking if the value is invalid.
///
/// This is a convenience free function for [`EndpointNameRef::constant`].
///
/// # Panics
///
/// Panics if `v` is not a valid endpoint name.
#[must_use]
pub const fn name_ref(v: &str) -> &EndpointNameRef {
    EndpointNameRef::constant(v)
}

impl fmt::Display for EndpointNameRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for EndpointName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        <EndpointNameRef as fmt::Display>::fmt(self, f)
    }
}

impl PartialEq<EndpointNameRef> for EndpointName {
    fn eq(&self, other: &EndpointNameRef) -> bool {
        <EndpointNameRef as PartialEq>::eq(self, other)
    }
}

impl PartialEq<EndpointName> for EndpointNameRef {
    fn eq(&self, other: &EndpointName) -> bool {
        <EndpointNameRef as PartialEq>::eq(self, other)
    }
}

impl PartialEq<str> for EndpointName {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for EndpointName {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl<'a> TryFrom<&'a str> for &'a EndpointNameRef {
    type Error = NameError;

    fn try_from(v: &'a str) -> Result<&'a EndpointNameRef, NameError> {
        EndpointNameRef::from_str(v)
    }
}

impl Borrow<str> for EndpointName {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl AsRef<str> for EndpointName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl AsRef<str> for EndpointNameRef {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(feature = "arbitrary")]
impl<'a> arbitrary::Arbitrary<'a> for EndpointName {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        EndpointNameRef::from_str(<&str>::arbitrary(u)?)
            .map(ToOwned::to_owned)
            .map_err(|_| arbitrary::Error::IncorrectFormat)
    }

    fn size_hint(_depth: usize) -> (usize, Option<usize>) {
        (1, None)
    }
}
