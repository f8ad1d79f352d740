//! Train identifier type.

use std::fmt;

/// Error returned when parsing an invalid train number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid train number: {reason}")]
pub struct InvalidTrainNumber {
    reason: &'static str,
}

/// Maximum accepted length of a train number.
const MAX_LEN: usize = 32;

/// A public train number, e.g. `"14120"` or `"EIP 1234"`.
///
/// This is the identifier shared by the live roster, the timetable feed and
/// ride records. Surrounding whitespace is trimmed on parse.
///
/// # Examples
///
/// ```
/// use delay_server::domain::TrainNumber;
///
/// let train = TrainNumber::parse("  EIP 1234 ").unwrap();
/// assert_eq!(train.as_str(), "EIP 1234");
/// assert_eq!(train.train_type(), "EIP");
///
/// assert!(TrainNumber::parse("   ").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrainNumber(String);

impl TrainNumber {
    /// Parse a train number from a string.
    ///
    /// The trimmed input must be non-empty, at most 32 characters, and free of
    /// control characters.
    pub fn parse(s: &str) -> Result<Self, InvalidTrainNumber> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(InvalidTrainNumber {
                reason: "must not be empty",
            });
        }

        if trimmed.chars().count() > MAX_LEN {
            return Err(InvalidTrainNumber {
                reason: "must be at most 32 characters",
            });
        }

        if trimmed.chars().any(char::is_control) {
            return Err(InvalidTrainNumber {
                reason: "must not contain control characters",
            });
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Returns the train number as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the category prefix of the number, upper-cased.
    ///
    /// Purely numeric numbers have no prefix and report `"UNKNOWN"`.
    pub fn train_type(&self) -> String {
        let prefix: String = self
            .0
            .chars()
            .take_while(|c| c.is_ascii_alphabetic())
            .collect();

        if prefix.is_empty() {
            "UNKNOWN".to_string()
        } else {
            prefix.to_ascii_uppercase()
        }
    }
}

impl fmt::Debug for TrainNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TrainNumber({})", self.0)
    }
}

impl fmt::Display for TrainNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid() {
        assert!(TrainNumber::parse("14120").is_ok());
        assert!(TrainNumber::parse("EIP 1234").is_ok());
        assert!(TrainNumber::parse("RJ 1021").is_ok());
    }

    #[test]
    fn parse_trims_whitespace() {
        let train = TrainNumber::parse("\t 14120 \n").unwrap();
        assert_eq!(train.as_str(), "14120");
    }

    #[test]
    fn reject_empty() {
        assert!(TrainNumber::parse("").is_err());
        assert!(TrainNumber::parse("    ").is_err());
    }

    #[test]
    fn reject_too_long() {
        let long = "1".repeat(33);
        assert!(TrainNumber::parse(&long).is_err());
        assert!(TrainNumber::parse(&"1".repeat(32)).is_ok());
    }

    #[test]
    fn reject_control_characters() {
        assert!(TrainNumber::parse("141\u{0}20").is_err());
    }

    #[test]
    fn train_type_from_prefix() {
        assert_eq!(TrainNumber::parse("eip1234").unwrap().train_type(), "EIP");
        assert_eq!(TrainNumber::parse("Os 7331").unwrap().train_type(), "OS");
        assert_eq!(TrainNumber::parse("14120").unwrap().train_type(), "UNKNOWN");
    }

    #[test]
    fn display_and_debug() {
        let train = TrainNumber::parse("RJ 1021").unwrap();
        assert_eq!(train.to_string(), "RJ 1021");
        assert_eq!(format!("{:?}", train), "TrainNumber(RJ 1021)");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Parsing is idempotent on the canonical form
        #[test]
        fn reparse_is_identity(s in "[A-Za-z]{0,4} ?[0-9]{1,6}") {
            let first = TrainNumber::parse(&s).unwrap();
            let second = TrainNumber::parse(first.as_str()).unwrap();
            prop_assert_eq!(first, second);
        }

        /// Padding never changes the parsed value
        #[test]
        fn padding_ignored(s in "[0-9]{1,6}", pad in " {0,4}") {
            let padded = format!("{pad}{s}{pad}");
            let parsed = TrainNumber::parse(&padded).unwrap();
            prop_assert_eq!(parsed.as_str(), s.as_str());
        }
    }
}
