//! Referral codes and referral links.
//!
//! A partner's numeric code is the only link between the partner and the
//! leads attributed to them. Leads store the code as text, so both sides go
//! through [`PartnerCode`] before being compared.

use crate::core::locale::Locale;
use serde::{Serialize, Serializer};
use std::fmt;

/// Normalized partner referral code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartnerCode(u64);

impl PartnerCode {
    /// Wraps a code. Codes are always non-negative.
    #[must_use]
    pub const fn new(code: u64) -> Self {
        Self(code)
    }

    /// The numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Reads the code stored on a partner profile. Negative codes are not codes.
    #[must_use]
    pub fn from_profile(code: Option<i64>) -> Option<Self> {
        code.and_then(|c| u64::try_from(c).ok()).map(Self)
    }

    /// Parses the text form stored on leads and carried by `?ref=` links.
    ///
    /// Surrounding whitespace is ignored; anything but decimal digits is rejected.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        raw.parse().ok().map(Self)
    }

    /// Whether a lead's stored code refers to this partner.
    #[must_use]
    pub fn matches(self, lead_code: Option<&str>) -> bool {
        lead_code.and_then(Self::parse) == Some(self)
    }
}

impl fmt::Display for PartnerCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for PartnerCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.0)
    }
}

/// Builds the shareable referral link, `{origin}/{locale}?ref={code}`.
///
/// Returns `None` for partners that have no code yet.
#[must_use]
pub fn build_referral_link(origin: &str, locale: Locale, code: Option<PartnerCode>) -> Option<String> {
    let code = code?;
    let origin = origin.trim_end_matches('/');
    Some(format!("{origin}/{}?ref={code}", locale.tag()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_code_no_link() {
        assert_eq!(build_referral_link("https://site.com", Locale::En, None), None);
    }

    #[test]
    fn test_link_format() {
        assert_eq!(
            build_referral_link("https://site.com", Locale::En, PartnerCode::parse("42")),
            Some("https://site.com/en?ref=42".to_string())
        );
        assert_eq!(
            build_referral_link("https://site.com/", Locale::PtBr, Some(PartnerCode::new(7))),
            Some("https://site.com/pt-BR?ref=7".to_string())
        );
    }

    #[test]
    fn test_parse_normalizes() {
        assert_eq!(PartnerCode::parse(" 42 "), Some(PartnerCode::new(42)));
        assert_eq!(PartnerCode::parse("0042"), Some(PartnerCode::new(42)));
        assert_eq!(PartnerCode::parse("-42"), None);
        assert_eq!(PartnerCode::parse("4 2"), None);
        assert_eq!(PartnerCode::parse(""), None);
        assert_eq!(PartnerCode::parse("abc"), None);
    }

    #[test]
    fn test_from_profile() {
        assert_eq!(PartnerCode::from_profile(Some(1001)), Some(PartnerCode::new(1001)));
        assert_eq!(PartnerCode::from_profile(Some(-1)), None);
        assert_eq!(PartnerCode::from_profile(None), None);
    }

    #[test]
    fn test_typed_join() {
        let code = PartnerCode::new(42);
        assert!(code.matches(Some("42")));
        assert!(code.matches(Some("042")));
        assert!(!code.matches(Some("420")));
        assert!(!code.matches(None));
    }
}
