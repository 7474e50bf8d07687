//! Supported site locales.
//!
//! The partner platform lives under `/{locale}/...`. Only two locales exist;
//! Brazilian Portuguese is the default.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A site locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Locale {
    /// Brazilian Portuguese, `pt-BR`
    #[default]
    #[serde(rename = "pt-BR")]
    PtBr,
    /// English, `en`
    #[serde(rename = "en")]
    En,
}

impl Locale {
    /// The canonical tag used in URLs.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::PtBr => "pt-BR",
            Self::En => "en",
        }
    }

    /// Parses a locale tag, ignoring ASCII case. `pt` is accepted for `pt-BR`.
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        if tag.eq_ignore_ascii_case("pt-BR") || tag.eq_ignore_ascii_case("pt") {
            Some(Self::PtBr)
        } else if tag.eq_ignore_ascii_case("en") {
            Some(Self::En)
        } else {
            None
        }
    }

    /// Parses the first segment of a request path, falling back to the default.
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        path.trim_start_matches('/')
            .split('/')
            .next()
            .and_then(Self::parse)
            .unwrap_or_default()
    }
}

impl FromStr for Locale {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| Error::UnsupportedLocale { tag: s.to_string() })
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
