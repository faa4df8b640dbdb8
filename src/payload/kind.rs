//! The data shapes a QR payload can take

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which input record is active and which formatting rule applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataKind {
    /// Plain URL
    #[default]
    Url,
    /// Free text
    Text,
    /// `mailto:` URI
    Email,
    /// `tel:` URI
    Phone,
    /// `sms:` URI
    Sms,
    /// vCard 3.0 block
    Contact,
    /// `WIFI:` network join string
    Wifi,
}

impl DataKind {
    /// Every kind in tab order.
    pub const ALL: [DataKind; 7] = [
        DataKind::Url,
        DataKind::Text,
        DataKind::Email,
        DataKind::Phone,
        DataKind::Sms,
        DataKind::Contact,
        DataKind::Wifi,
    ];

    /// Lowercase identifier, also used in file names.
    pub fn as_str(self) -> &'static str {
        match self {
            DataKind::Url => "url",
            DataKind::Text => "text",
            DataKind::Email => "email",
            DataKind::Phone => "phone",
            DataKind::Sms => "sms",
            DataKind::Contact => "contact",
            DataKind::Wifi => "wifi",
        }
    }

    /// Human-readable tab label.
    pub fn label(self) -> &'static str {
        match self {
            DataKind::Url => "URL",
            DataKind::Text => "Text",
            DataKind::Email => "Email",
            DataKind::Phone => "Phone",
            DataKind::Sms => "SMS",
            DataKind::Contact => "Contact",
            DataKind::Wifi => "WiFi",
        }
    }

    /// File name used when the rendered image is saved.
    pub fn download_name(self) -> String {
        format!("qr-code-{}.png", self.as_str())
    }

    /// Parse a kind identifier (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataKind {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(value).ok_or_else(|| {
            format!(
                "Unknown data kind '{value}', expected one of url, text, email, phone, sms, contact, wifi"
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_kind_by_name() {
        for kind in DataKind::ALL {
            assert_eq!(kind.as_str().parse::<DataKind>(), Ok(kind));
            assert_eq!(DataKind::parse(&kind.as_str().to_uppercase()), Some(kind));
        }
    }

    #[test]
    fn rejects_unknown_kind() {
        let err = "fax".parse::<DataKind>().unwrap_err();
        assert!(err.contains("fax"));
    }

    #[test]
    fn default_is_url() {
        assert_eq!(DataKind::default(), DataKind::Url);
    }

    #[test]
    fn download_name_uses_kind() {
        assert_eq!(DataKind::Wifi.download_name(), "qr-code-wifi.png");
        assert_eq!(DataKind::Contact.download_name(), "qr-code-contact.png");
    }
}
