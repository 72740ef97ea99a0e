//! Country restriction codes.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Error returned when parsing an invalid country code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid country code: {reason}")]
pub struct InvalidCountryCode {
    reason: &'static str,
}

/// An ISO 3166-1 alpha-2 country code, stored lowercase.
///
/// Place lookups are restricted to one country. Any `CountryCode` value is
/// two ASCII letters by construction.
///
/// # Examples
///
/// ```
/// use trip_server::domain::CountryCode;
///
/// let us = CountryCode::parse("US").unwrap();
/// assert_eq!(us.as_str(), "us");
///
/// assert!(CountryCode::parse("USA").is_err());
/// assert!(CountryCode::parse("u1").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CountryCode([u8; 2]);

impl CountryCode {
    /// Parse a country code, accepting either case.
    pub fn parse(s: &str) -> Result<Self, InvalidCountryCode> {
        let bytes = s.trim().as_bytes();

        if bytes.len() != 2 {
            return Err(InvalidCountryCode {
                reason: "must be exactly 2 characters",
            });
        }

        if !bytes.iter().all(u8::is_ascii_alphabetic) {
            return Err(InvalidCountryCode {
                reason: "must be ASCII letters",
            });
        }

        Ok(CountryCode([
            bytes[0].to_ascii_lowercase(),
            bytes[1].to_ascii_lowercase(),
        ]))
    }

    /// Returns the code as a lowercase string slice.
    pub fn as_str(&self) -> &str {
        // Only ASCII letters are ever stored.
        std::str::from_utf8(&self.0).unwrap_or("??")
    }
}

impl fmt::Debug for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CountryCode({})", self.as_str())
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CountryCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CountryCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
