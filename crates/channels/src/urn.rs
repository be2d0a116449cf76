use std::{
    fmt,
    hash::{Hash, Hasher},
};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub const FRESHCHAT_SCHEME: &str = "freshchat";
pub const SLACK_SCHEME: &str = "slack";
pub const TEL_SCHEME: &str = "tel";
pub const WHATSAPP_SCHEME: &str = "whatsapp";

/// Canonical address of a sender or recipient.
///
/// Two URNs are equal when scheme and path match; the display name is
/// informational only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Urn {
    scheme: String,
    path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    display: Option<String>,
}

impl Urn {
    pub fn new(scheme: &str, path: impl Into<String>) -> Result<Self> {
        let path = path.into();
        if scheme.is_empty() {
            return Err(Error::validation("URN scheme cannot be empty"));
        }
        if path.trim().is_empty() {
            return Err(Error::validation(format!("empty path for {scheme} URN")));
        }
        Ok(Self {
            scheme: scheme.to_string(),
            path,
            display: None,
        })
    }

    /// `tel:` URN with the number reduced to `+` and digits.
    ///
    /// Numbers that do not carry an explicit `+` are assumed to already
    /// include the country calling code, which is how SMS aggregators report
    /// them.
    pub fn tel(number: &str) -> Result<Self> {
        Self::tel_for_country(number, None)
    }

    /// `tel:` URN for a number reported by a channel in `country`.
    ///
    /// A number without `+` gets the country's calling code prepended unless
    /// it already starts with it. Trunk zeros are dropped before the code is
    /// added. Unknown countries leave the digits as reported.
    pub fn tel_for_country(number: &str, country: Option<&str>) -> Result<Self> {
        let digits: String = number.chars().filter(char::is_ascii_digit).collect();
        if digits.is_empty() {
            return Err(Error::validation(format!("invalid phone number '{number}'")));
        }
        if number.trim_start().starts_with('+') {
            return Self::new(TEL_SCHEME, format!("+{digits}"));
        }

        let code = country.and_then(calling_code);
        let path = match code {
            Some(code) if !digits.starts_with(code) => {
                let national = digits.trim_start_matches('0');
                if national.is_empty() {
                    return Err(Error::validation(format!("invalid phone number '{number}'")));
                }
                format!("+{code}{national}")
            },
            _ => format!("+{digits}"),
        };
        Self::new(TEL_SCHEME, path)
    }

    /// `whatsapp:` URN; the path is the bare digit string.
    pub fn whatsapp(number: &str) -> Result<Self> {
        let trimmed = number.trim().trim_start_matches('+');
        if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(Error::validation(format!("invalid WhatsApp id '{number}'")));
        }
        Self::new(WHATSAPP_SCHEME, trimmed)
    }

    #[must_use]
    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        let display = display.into();
        self.display = (!display.is_empty()).then_some(display);
        self
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn display(&self) -> Option<&str> {
        self.display.as_deref()
    }
}

impl PartialEq for Urn {
    fn eq(&self, other: &Self) -> bool {
        self.scheme == other.scheme && self.path == other.path
    }
}

impl Eq for Urn {}

impl Hash for Urn {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.scheme.hash(state);
        self.path.hash(state);
    }
}

impl fmt::Display for Urn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.scheme, self.path)
    }
}

/// ISO 3166 alpha-2 code to E.164 calling code.
const CALLING_CODES: &[(&str, &str)] = &[
    ("AR", "54"),
    ("BR", "55"),
    ("CA", "1"),
    ("CL", "56"),
    ("CO", "57"),
    ("DE", "49"),
    ("EC", "593"),
    ("ES", "34"),
    ("FR", "33"),
    ("GB", "44"),
    ("IN", "91"),
    ("IT", "39"),
    ("KE", "254"),
    ("MX", "52"),
    ("NG", "234"),
    ("PE", "51"),
    ("PT", "351"),
    ("PY", "595"),
    ("RW", "250"),
    ("UG", "256"),
    ("US", "1"),
    ("UY", "598"),
    ("ZA", "27"),
];

fn calling_code(country: &str) -> Option<&'static str> {
    let country = country.trim();
    CALLING_CODES
        .iter()
        .find(|(iso, _)| iso.eq_ignore_ascii_case(country))
        .map(|(_, code)| *code)
}
