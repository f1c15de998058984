use crate::error::Repr;
use crate::utils;
use crate::{EndpointName, EndpointNameRef, EndpointUrl, ReportingResult};

use indexmap::IndexMap;

/// The endpoints configured by a `Reporting-Endpoints` header, in header
/// order.
pub type Endpoints = IndexMap<EndpointName, EndpointUrl>;

// Dictionary members, with `None` for any value that is not a string.
pub(crate) type Members = IndexMap<EndpointName, Option<EndpointUrl>>;

/// Parses the value of a `Reporting-Endpoints` header.
///
/// The value is parsed as a structured-field [dictionary]. Members whose
/// value is not a string are ignored, as are all parameters. If the header
/// was split across several field lines, join them with `", "` first.
///
/// ```
/// # fn main() -> Result<(), reporting_api::Error> {
/// let endpoints = reporting_api::parse_endpoints(
///     r#"csp="https://example.com/csp", legacy=?0, coep="https://example.com/coep";p=1"#,
/// )?;
///
/// assert_eq!(endpoints.len(), 2);
/// assert_eq!(endpoints["csp"], "https://example.com/csp");
/// assert_eq!(endpoints["coep"], "https://example.com/coep");
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns an error of kind [`ErrorKind::Parse`][crate::ErrorKind::Parse] if
/// the value is not a valid dictionary. No endpoints are returned in that
/// case, even if some members were well-formed.
///
/// [dictionary]: <https://httpwg.org/specs/rfc8941.html#dictionary>
pub fn parse_endpoints(input: &str) -> ReportingResult<Endpoints> {
    Parser::new(input).parse_endpoints()
}

/// Exposes methods for parsing a `Reporting-Endpoints` header.
pub struct Parser<'a> {
    input: &'a str,
    index: usize,
}

impl<'a> Parser<'a> {
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self { input, index: 0 }
    }

    /// Parses the input into the endpoints it configures.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a valid structured-field
    /// dictionary.
    pub fn parse_endpoints(mut self) -> ReportingResult<Endpoints> {
        // https://httpwg.org/specs/rfc8941.html#text-parse

        self.consume_sp_chars();

        let members = self.parse_dictionary()?;

        self.consume_sp_chars();

        if self.peek().is_some() {
            return self.error(Repr::TrailingCharactersAfterParsedValue);
        }

        // https://w3c.github.io/reporting/#process-header
        Ok(members
            .into_iter()
            .filter_map(|(name, url)| {
                if url.is_none() {
                    tracing::trace!(endpoint = %name, "ignoring non-string endpoint");
                }
                Some((name, url?))
            })
            .collect())
    }

    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.index).copied()
    }

    fn next(&mut self) -> Option<u8> {
        self.peek().inspect(|_| self.index += 1)
    }

    fn error<T>(&self, repr: fn(usize) -> Repr) -> ReportingResult<T> {
        Err(repr(self.index).into())
    }

    pub(crate) fn parse_dictionary(&mut self) -> ReportingResult<Members> {
        // https://httpwg.org/specs/rfc8941.html#parse-dictionary

        let mut dict = IndexMap::new();

        while self.peek().is_some() {
            let this_key = self.parse_key()?;

            let member = if let Some(b'=') = self.peek() {
                self.next();
                self.parse_list_entry()?
            } else {
                // Boolean true, which is never a URL.
                self.parse_parameters()?;
                None
            };
            // Duplicate keys keep their first position and take the last value.
            dict.insert(this_key, member);

            self.consume_ows_chars();

            if self.peek().is_none() {
                return Ok(dict);
            }

            let comma_index = self.index;

            if let Some(c) = self.peek() {
                if c != b',' {
                    return self.error(Repr::TrailingCharactersAfterMember);
                }
                self.next();
            }

            self.consume_ows_chars();

            if self.peek().is_none() {
                // Report the error at the position of the comma itself, rather
                // than at the end of input.
                return Err(Repr::TrailingComma(comma_index).into());
            }
        }

        Ok(dict)
    }

    fn parse_list_entry(&mut self) -> ReportingResult<Option<EndpointUrl>> {
        // https://httpwg.org/specs/rfc8941.html#parse-item-or-list

        if let Some(b'(') = self.peek() {
            self.parse_inner_list()?;
            Ok(None)
        } else {
            let bare_item = self.parse_bare_item()?;
            self.parse_parameters()?;
            Ok(bare_item)
        }
    }

    fn parse_inner_list(&mut self) -> ReportingResult<()> {
        // https://httpwg.org/specs/rfc8941.html#parse-innerlist

        self.next();

        while self.peek().is_some() {
            self.consume_sp_chars();

            if Some(b')') == self.peek() {
                self.next();
                return self.parse_parameters();
            }

            self.parse_bare_item()?;
            self.parse_parameters()?;

            if let Some(c) = self.peek() {
                if c != b' ' && c != b')' {
                    return self.error(Repr::ExpectedInnerListDelimiter);
                }
            }
        }

        self.error(Repr::UnterminatedInnerList)
    }

    /// Parses a bare item, returning its value only if it is a string.
    fn parse_bare_item(&mut self) -> ReportingResult<Option<EndpointUrl>> {
        // https://httpwg.org/specs/rfc8941.html#parse-bare-item

        match self.peek() {
            Some(b'"') => return self.parse_string().map(Some),
            Some(b'?') => self.parse_bool()?,
            Some(b':') => self.parse_byte_sequence()?,
            Some(c) if utils::is_allowed_start_token_char(c) => self.parse_token(),
            Some(c) if c == b'-' || c.is_ascii_digit() => self.parse_number()?,
            _ => return self.error(Repr::ExpectedStartOfBareItem),
        }
        Ok(None)
    }

    fn parse_bool(&mut self) -> ReportingResult<()> {
        // https://httpwg.org/specs/rfc8941.html#parse-boolean

        self.next();

        match self.peek() {
            Some(b'0' | b'1') => {
                self.next();
                Ok(())
            }
            _ => self.error(Repr::ExpectedBoolean),
        }
    }

    fn parse_string(&mut self) -> ReportingResult<EndpointUrl> {
        // https://httpwg.org/specs/rfc8941.html#parse-string

        self.next();

        let mut output_string = String::new();
        while let Some(curr_char) = self.peek() {
            match curr_char {
                b'"' => {
                    self.next();
                    return Ok(EndpointUrl(output_string));
                }
                0x00..=0x1f | 0x7f..=0xff => {
                    return self.error(Repr::InvalidStringCharacter);
                }
                b'\\' => {
                    self.next();
                    match self.peek() {
                        Some(c @ (b'\\' | b'"')) => {
                            self.next();
                            output_string.push(char::from(c));
                        }
                        None => return self.error(Repr::UnterminatedEscapeSequence),
                        Some(_) => return self.error(Repr::InvalidEscapeSequence),
                    }
                }
                _ => {
                    self.next();
                    output_string.push(char::from(curr_char));
                }
            }
        }
        self.error(Repr::UnterminatedString)
    }

    fn parse_token(&mut self) {
        // https://httpwg.org/specs/rfc8941.html#parse-token

        self.next();
        while let Some(c) = self.peek() {
            if !utils::is_allowed_inner_token_char(c) {
                break;
            }
            self.next();
        }
    }

    fn parse_byte_sequence(&mut self) -> ReportingResult<()> {
        // https://httpwg.org/specs/rfc8941.html#parse-binary

        self.next();
        let start = self.index;

        loop {
            match self.next() {
                Some(b':') => break,
                Some(_) => {}
                None => return self.error(Repr::UnterminatedByteSequence),
            }
        }

        let colon_index = self.index - 1;

        match base64::Engine::decode(&utils::BASE64, &self.input[start..colon_index]) {
            Ok(_) => Ok(()),
            Err(err) => {
                let index = match err {
                    base64::DecodeError::InvalidByte(offset, _)
                    | base64::DecodeError::InvalidLastSymbol(offset, _) => start + offset,
                    // Report these two at the position of the last base64
                    // character, since they correspond to errors in the input
                    // as a whole.
                    base64::DecodeError::InvalidLength(_) | base64::DecodeError::InvalidPadding => {
                        colon_index - 1
                    }
                };

                Err(Repr::InvalidByteSequence(index).into())
            }
        }
    }

    fn parse_number(&mut self) -> ReportingResult<()> {
        // https://httpwg.org/specs/rfc8941.html#parse-number

        if let Some(b'-') = self.peek() {
            self.next();
        }

        match self.peek() {
            Some(b'0'..=b'9') => {
                self.next();
            }
            _ => return self.error(Repr::ExpectedDigit),
        }

        let mut digits = 1;

        loop {
            match self.peek() {
                Some(b'.') => {
                    if digits > 12 {
                        return self.error(Repr::TooManyDigitsBeforeDecimalPoint);
                    }
                    self.next();
                    break;
                }
                Some(b'0'..=b'9') => {
                    digits += 1;
                    if digits > 15 {
                        return self.error(Repr::TooManyDigits);
                    }
                    self.next();
                }
                _ => return Ok(()),
            }
        }

        digits = 0;

        while let Some(b'0'..=b'9') = self.peek() {
            if digits == 3 {
                return self.error(Repr::TooManyDigitsAfterDecimalPoint);
            }

            self.next();
            digits += 1;
        }

        if digits == 0 {
            // Report the error at the position of the decimal itself, rather
            // than the next position.
            Err(Repr::TrailingDecimalPoint(self.index - 1).into())
        } else {
            Ok(())
        }
    }

    fn parse_parameters(&mut self) -> ReportingResult<()> {
        // https://httpwg.org/specs/rfc8941.html#parse-param

        while let Some(b';') = self.peek() {
            self.next();
            self.consume_sp_chars();

            self.parse_key()?;
            if let Some(b'=') = self.peek() {
                self.next();
                self.parse_bare_item()?;
            }
        }

        Ok(())
    }

    fn parse_key(&mut self) -> ReportingResult<EndpointName> {
        // https://httpwg.org/specs/rfc8941.html#parse-key

        let start = self.index;

        match self.peek() {
            Some(c) if utils::is_allowed_start_key_char(c) => {
                self.next();
            }
            _ => return self.error(Repr::ExpectedStartOfKey),
        }

        while let Some(c) = self.peek() {
            if !utils::is_allowed_inner_key_char(c) {
                break;
            }
            self.next();
        }

        Ok(EndpointNameRef::cast(&self.input[start..self.index]).to_owned())
    }

    fn consume_ows_chars(&mut self) {
        while let Some(b' ' | b'\t') = self.peek() {
            self.next();
        }
    }

    fn consume_sp_chars(&mut self) {
        while let Some(b' ') = self.peek() {
            self.next();
        }
    }

    #[cfg(test)]
    pub(crate) fn remaining(&self) -> &[u8] {
        &self.input.as_bytes()[self.index..]
    }
}
