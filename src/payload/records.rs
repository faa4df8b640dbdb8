//! Per-kind input records

use super::DataKind;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Named-field access used by interactive editing.
pub trait Fields {
    /// Field names accepted by [`Fields::set_field`], in display order.
    const NAMES: &'static [&'static str];

    /// Assign a field from its textual value.
    fn set_field(&mut self, name: &str, value: &str) -> Result<()>;
}

fn unknown_field(kind: DataKind, name: &str, names: &[&str]) -> Error {
    Error::Field(format!(
        "'{name}' is not a {kind} field (expected one of: {})",
        names.join(", ")
    ))
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Ok(true),
        "0" | "false" | "off" | "no" | "" => Ok(false),
        other => Err(Error::Field(format!(
            "'{other}' is not a boolean value for {name}"
        ))),
    }
}

/// URL input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrlRecord {
    /// Target URL
    pub url: String,
}

/// Free text input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextRecord {
    /// Arbitrary text
    pub text: String,
}

/// Email composition input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailRecord {
    /// Recipient address
    pub email: String,
    /// Subject line
    pub subject: String,
    /// Message body
    pub body: String,
}

/// Phone call input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhoneRecord {
    /// Number to dial
    pub number: String,
}

/// Text message input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmsRecord {
    /// Recipient number
    pub number: String,
    /// Message text
    pub message: String,
}

/// Contact card input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactRecord {
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Company or organization
    pub organization: String,
    /// Job title
    pub title: String,
    /// Email address
    pub email: String,
    /// Work/home phone
    pub phone: String,
    /// Mobile phone
    pub mobile: String,
}

/// WiFi network credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WifiRecord {
    /// Network name
    pub ssid: String,
    /// Network password
    pub password: String,
    /// Security type as shown to scanners (`WPA`, `WEP`, `nopass`, ...)
    pub security: String,
    /// Whether the SSID is hidden
    pub hidden: bool,
}

impl Default for WifiRecord {
    fn default() -> Self {
        Self {
            ssid: String::new(),
            password: String::new(),
            security: "WPA".to_string(),
            hidden: false,
        }
    }
}

impl Fields for UrlRecord {
    const NAMES: &'static [&'static str] = &["url"];

    fn set_field(&mut self, name: &str, value: &str) -> Result<()> {
        match name {
            "url" => self.url = value.to_string(),
            _ => return Err(unknown_field(DataKind::Url, name, Self::NAMES)),
        }
        Ok(())
    }
}

impl Fields for TextRecord {
    const NAMES: &'static [&'static str] = &["text"];

    fn set_field(&mut self, name: &str, value: &str) -> Result<()> {
        match name {
            "text" => self.text = value.to_string(),
            _ => return Err(unknown_field(DataKind::Text, name, Self::NAMES)),
        }
        Ok(())
    }
}

impl Fields for EmailRecord {
    const NAMES: &'static [&'static str] = &["email", "subject", "body"];

    fn set_field(&mut self, name: &str, value: &str) -> Result<()> {
        match name {
            "email" => self.email = value.to_string(),
            "subject" => self.subject = value.to_string(),
            "body" => self.body = value.to_string(),
            _ => return Err(unknown_field(DataKind::Email, name, Self::NAMES)),
        }
        Ok(())
    }
}

impl Fields for PhoneRecord {
    const NAMES: &'static [&'static str] = &["number"];

    fn set_field(&mut self, name: &str, value: &str) -> Result<()> {
        match name {
            "number" | "phone" => self.number = value.to_string(),
            _ => return Err(unknown_field(DataKind::Phone, name, Self::NAMES)),
        }
        Ok(())
    }
}

impl Fields for SmsRecord {
    const NAMES: &'static [&'static str] = &["number", "message"];

    fn set_field(&mut self, name: &str, value: &str) -> Result<()> {
        match name {
            "number" | "phone" => self.number = value.to_string(),
            "message" | "body" => self.message = value.to_string(),
            _ => return Err(unknown_field(DataKind::Sms, name, Self::NAMES)),
        }
        Ok(())
    }
}

impl Fields for ContactRecord {
    const NAMES: &'static [&'static str] = &[
        "first_name",
        "last_name",
        "organization",
        "title",
        "email",
        "phone",
        "mobile",
    ];

    fn set_field(&mut self, name: &str, value: &str) -> Result<()> {
        let slot = match name {
            "first_name" | "first" => &mut self.first_name,
            "last_name" | "last" => &mut self.last_name,
            "organization" | "org" => &mut self.organization,
            "title" => &mut self.title,
            "email" => &mut self.email,
            "phone" => &mut self.phone,
            "mobile" => &mut self.mobile,
            _ => return Err(unknown_field(DataKind::Contact, name, Self::NAMES)),
        };
        *slot = value.to_string();
        Ok(())
    }
}

impl Fields for WifiRecord {
    const NAMES: &'static [&'static str] = &["ssid", "password", "security", "hidden"];

    fn set_field(&mut self, name: &str, value: &str) -> Result<()> {
        match name {
            "ssid" => self.ssid = value.to_string(),
            "password" => self.password = value.to_string(),
            "security" => self.security = value.to_string(),
            "hidden" => self.hidden = parse_flag(name, value)?,
            _ => return Err(unknown_field(DataKind::Wifi, name, Self::NAMES)),
        }
        Ok(())
    }
}

/// One record tagged with its kind; the input to the payload formatter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Record {
    /// URL input
    Url(UrlRecord),
    /// Free text input
    Text(TextRecord),
    /// Email input
    Email(EmailRecord),
    /// Phone input
    Phone(PhoneRecord),
    /// SMS input
    Sms(SmsRecord),
    /// Contact card input
    Contact(ContactRecord),
    /// WiFi input
    Wifi(WifiRecord),
}

impl Record {
    /// The kind this record belongs to.
    pub fn kind(&self) -> DataKind {
        match self {
            Record::Url(_) => DataKind::Url,
            Record::Text(_) => DataKind::Text,
            Record::Email(_) => DataKind::Email,
            Record::Phone(_) => DataKind::Phone,
            Record::Sms(_) => DataKind::Sms,
            Record::Contact(_) => DataKind::Contact,
            Record::Wifi(_) => DataKind::Wifi,
        }
    }
}

/// All per-kind records owned by one form. Switching kind keeps every record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormRecords {
    /// URL record
    pub url: UrlRecord,
    /// Text record
    pub text: TextRecord,
    /// Email record
    pub email: EmailRecord,
    /// Phone record
    pub phone: PhoneRecord,
    /// SMS record
    pub sms: SmsRecord,
    /// Contact record
    pub contact: ContactRecord,
    /// WiFi record
    pub wifi: WifiRecord,
}

impl FormRecords {
    /// Snapshot of the record for `kind`.
    pub fn record(&self, kind: DataKind) -> Record {
        match kind {
            DataKind::Url => Record::Url(self.url.clone()),
            DataKind::Text => Record::Text(self.text.clone()),
            DataKind::Email => Record::Email(self.email.clone()),
            DataKind::Phone => Record::Phone(self.phone.clone()),
            DataKind::Sms => Record::Sms(self.sms.clone()),
            DataKind::Contact => Record::Contact(self.contact.clone()),
            DataKind::Wifi => Record::Wifi(self.wifi.clone()),
        }
    }

    /// Replace the record matching the given record's kind.
    pub fn replace(&mut self, record: Record) {
        match record {
            Record::Url(r) => self.url = r,
            Record::Text(r) => self.text = r,
            Record::Email(r) => self.email = r,
            Record::Phone(r) => self.phone = r,
            Record::Sms(r) => self.sms = r,
            Record::Contact(r) => self.contact = r,
            Record::Wifi(r) => self.wifi = r,
        }
    }

    /// Assign one named field of the `kind` record.
    pub fn set_field(&mut self, kind: DataKind, name: &str, value: &str) -> Result<()> {
        let name = name.trim().to_ascii_lowercase().replace('-', "_");
        match kind {
            DataKind::Url => self.url.set_field(&name, value),
            DataKind::Text => self.text.set_field(&name, value),
            DataKind::Email => self.email.set_field(&name, value),
            DataKind::Phone => self.phone.set_field(&name, value),
            DataKind::Sms => self.sms.set_field(&name, value),
            DataKind::Contact => self.contact.set_field(&name, value),
            DataKind::Wifi => self.wifi.set_field(&name, value),
        }
    }

    /// Field names accepted for `kind`.
    pub fn field_names(kind: DataKind) -> &'static [&'static str] {
        match kind {
            DataKind::Url => UrlRecord::NAMES,
            DataKind::Text => TextRecord::NAMES,
            DataKind::Email => EmailRecord::NAMES,
            DataKind::Phone => PhoneRecord::NAMES,
            DataKind::Sms => SmsRecord::NAMES,
            DataKind::Contact => ContactRecord::NAMES,
            DataKind::Wifi => WifiRecord::NAMES,
        }
    }

    /// Formatted payload for `kind`.
    pub fn payload(&self, kind: DataKind) -> String {
        super::format(&self.record(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wifi_defaults_to_wpa() {
        let wifi = WifiRecord::default();
        assert_eq!(wifi.security, "WPA");
        assert!(!wifi.hidden);
    }

    #[test]
    fn set_field_accepts_aliases_and_dashes() {
        let mut records = FormRecords::default();
        records
            .set_field(DataKind::Contact, "first-name", "Jane")
            .unwrap();
        records.set_field(DataKind::Contact, "org", "Acme").unwrap();
        assert_eq!(records.contact.first_name, "Jane");
        assert_eq!(records.contact.organization, "Acme");
    }

    #[test]
    fn set_field_rejects_unknown_names() {
        let mut records = FormRecords::default();
        let err = records
            .set_field(DataKind::Phone, "ssid", "x")
            .unwrap_err();
        assert!(matches!(err, Error::Field(_)));
        assert_eq!(records, FormRecords::default());
    }

    #[test]
    fn hidden_flag_parses_booleans() {
        let mut records = FormRecords::default();
        records.set_field(DataKind::Wifi, "hidden", "yes").unwrap();
        assert!(records.wifi.hidden);
        records.set_field(DataKind::Wifi, "hidden", "off").unwrap();
        assert!(!records.wifi.hidden);
        assert!(records.set_field(DataKind::Wifi, "hidden", "maybe").is_err());
    }

    #[test]
    fn replace_only_touches_matching_kind() {
        let mut records = FormRecords::default();
        records.set_field(DataKind::Text, "text", "keep me").unwrap();
        records.replace(Record::Phone(PhoneRecord {
            number: "555".to_string(),
        }));
        assert_eq!(records.phone.number, "555");
        assert_eq!(records.text.text, "keep me");
        assert_eq!(records.record(DataKind::Phone).kind(), DataKind::Phone);
    }
}
