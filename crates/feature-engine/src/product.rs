//! Product Code Parsing

use crate::FeatureError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

fn product_code_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^([A-Z])([0-9]+)$").expect("static pattern compiles"))
}

/// A product code split into its quality letter and serial number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductCode {
    /// Quality variant letter (L, M, H in the reference data)
    pub quality: char,
    /// Serial number
    pub serial: u64,
}

impl ProductCode {
    /// Parse a code of the form `[A-Z][0-9]+`, e.g. `M14949`.
    ///
    /// The whole string must match; surrounding whitespace is rejected.
    pub fn parse(code: &str) -> Result<Self, FeatureError> {
        let invalid = |reason: &str| FeatureError::InvalidProductCode {
            code: code.to_string(),
            reason: reason.to_string(),
        };

        let captures = product_code_pattern()
            .captures(code)
            .ok_or_else(|| invalid("expected an uppercase letter followed by digits"))?;

        let quality = captures[1]
            .chars()
            .next()
            .ok_or_else(|| invalid("missing quality letter"))?;
        let serial = captures[2]
            .parse::<u64>()
            .map_err(|_| invalid("serial number out of range"))?;

        Ok(Self { quality, serial })
    }

    /// Quality letter as an owned category value
    pub fn quality_label(&self) -> String {
        self.quality.to_string()
    }
}

impl FromStr for ProductCode {
    type Err = FeatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ProductCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.quality, self.serial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_valid_code() {
        let code = ProductCode::parse("M14949").unwrap();
        assert_eq!(code.quality, 'M');
        assert_eq!(code.serial, 14949);
        assert_eq!(code.quality_label(), "M");
    }

    #[test]
    fn test_parse_rejects_surrounding_whitespace() {
        for padded in [" M14949 ", "M14949 ", " M14949", "M14949\n"] {
            assert!(
                matches!(padded.parse::<ProductCode>(), Err(FeatureError::InvalidProductCode { .. })),
                "accepted {:?}",
                padded
            );
        }
        assert!(ProductCode::parse("M14949").is_ok());
    }

    #[test]
    fn test_parse_rejects_non_ascii_digits() {
        assert!(ProductCode::parse("M١٢٣").is_err());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "14949", "m14949", "MM14949", "M", "M14x49", "M-14949"] {
            let err = ProductCode::parse(bad).unwrap_err();
            assert!(
                matches!(err, FeatureError::InvalidProductCode { ref code, .. } if code == bad),
                "expected InvalidProductCode for {:?}, got {:?}",
                bad,
                err
            );
        }
    }

    #[test]
    fn test_parse_rejects_serial_overflow() {
        let err = ProductCode::parse("H99999999999999999999999").unwrap_err();
        match err {
            FeatureError::InvalidProductCode { reason, .. } => {
                assert!(reason.contains("out of range"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    proptest! {
        #[test]
        fn prop_valid_codes_parse(quality in "[A-Z]", serial in 0u64..10_000_000) {
            let text = format!("{}{}", quality, serial);
            let code = ProductCode::parse(&text).unwrap();
            prop_assert_eq!(code.quality_label(), quality);
            prop_assert_eq!(code.serial, serial);
            prop_assert_eq!(code.to_string(), text);
        }

        #[test]
        fn prop_lowercase_prefix_rejected(quality in "[a-z]", serial in 0u64..10_000_000) {
            let text = format!("{}{}", quality, serial);
            prop_assert!(ProductCode::parse(&text).is_err());
        }
    }
}
