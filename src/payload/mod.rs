//! Payload formatting
//!
//! Turns a typed [`Record`] into the text that gets encoded into the QR
//! symbol. Every kind maps onto a fixed micro-format:
//!
//! | Kind    | Payload                                              |
//! |---------|------------------------------------------------------|
//! | url     | raw URL (placeholder when blank)                     |
//! | text    | raw text (placeholder when blank)                    |
//! | email   | `mailto:<to>?subject=<pct>&body=<pct>`               |
//! | phone   | `tel:<number>`                                       |
//! | sms     | `sms:<number>?body=<pct>`                            |
//! | contact | vCard 3.0 block                                      |
//! | wifi    | `WIFI:T:<sec>;S:<ssid>;P:<pass>;H:<hidden>;`         |
//!
//! Nothing is validated. Only free-text email/sms fields are percent-encoded.

mod kind;
mod records;

pub use kind::DataKind;
pub use records::{
    ContactRecord, EmailRecord, Fields, FormRecords, PhoneRecord, Record, SmsRecord, TextRecord,
    UrlRecord, WifiRecord,
};

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Payload used for the url kind while the field is blank.
pub const URL_PLACEHOLDER: &str = "https://example.com";

/// Payload used for the text kind while the field is blank.
pub const TEXT_PLACEHOLDER: &str = "Enter your text here";

/// Characters left alone by URI component encoding.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a free-text URI component.
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

/// Format a record into its QR payload text.
pub fn format(record: &Record) -> String {
    match record {
        Record::Url(r) => or_placeholder(&r.url, URL_PLACEHOLDER),
        Record::Text(r) => or_placeholder(&r.text, TEXT_PLACEHOLDER),
        Record::Email(r) => format!(
            "mailto:{}?subject={}&body={}",
            r.email,
            encode_component(&r.subject),
            encode_component(&r.body)
        ),
        Record::Phone(r) => format!("tel:{}", r.number),
        Record::Sms(r) => format!("sms:{}?body={}", r.number, encode_component(&r.message)),
        Record::Contact(r) => vcard(r),
        Record::Wifi(r) => format!(
            "WIFI:T:{};S:{};P:{};H:{};",
            r.security, r.ssid, r.password, r.hidden
        ),
    }
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    if value.is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}

fn vcard(r: &ContactRecord) -> String {
    [
        "BEGIN:VCARD".to_string(),
        "VERSION:3.0".to_string(),
        format!("FN:{} {}", r.first_name, r.last_name),
        format!("ORG:{}", r.organization),
        format!("TITLE:{}", r.title),
        format!("EMAIL:{}", r.email),
        format!("TEL:{}", r.phone),
        format!("TEL;TYPE=CELL:{}", r.mobile),
        "END:VCARD".to_string(),
    ]
    .join("\n")
}
