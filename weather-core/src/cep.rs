use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static CEP_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{5}-[0-9]{3}$").expect("cep pattern is valid"));

/// A validated Brazilian postal code in the `NNNNN-NNN` format.
///
/// [`Cep::parse`] is the only way to construct one, so any value handed to a
/// resolver has already matched the pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cep(String);

/// Rejection kinds for raw CEP input.
///
/// The two variants are distinct on purpose: services map `Missing` to
/// 400 Bad Request and `Invalid` to 422 Unprocessable Entity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CepError {
    #[error("param 'cep' is required")]
    Missing,
    #[error("invalid zipcode")]
    Invalid,
}

impl Cep {
    /// Validate raw input. No trimming, no alternate formats; the match is
    /// exact.
    pub fn parse(raw: &str) -> Result<Self, CepError> {
        if raw.is_empty() {
            return Err(CepError::Missing);
        }
        if !CEP_PATTERN.is_match(raw) {
            return Err(CepError::Invalid);
        }
        Ok(Self(raw.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_cep_parses() {
        let cep = Cep::parse("01001-000").expect("well-formed cep must parse");
        assert_eq!(cep.as_str(), "01001-000");
        assert_eq!(cep.to_string(), "01001-000");
    }

    #[test]
    fn empty_input_is_missing() {
        assert_eq!(Cep::parse("").unwrap_err(), CepError::Missing);
    }

    #[test]
    fn malformed_input_is_invalid() {
        for raw in [
            "abc",
            "12345",
            "12345678",
            "1234-5678",
            "12345-67",
            "12345-6789",
            "12345-67a",
            "a2345-678",
        ] {
            assert_eq!(Cep::parse(raw).unwrap_err(), CepError::Invalid, "input: {raw}");
        }
    }

    #[test]
    fn no_normalization_of_surrounding_whitespace() {
        assert_eq!(Cep::parse(" 01001-000").unwrap_err(), CepError::Invalid);
        assert_eq!(Cep::parse("01001-000 ").unwrap_err(), CepError::Invalid);
        assert_eq!(Cep::parse("01001 000").unwrap_err(), CepError::Invalid);
    }
}
