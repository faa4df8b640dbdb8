//! Helpers for rendering form results for the terminal or as JSON

use crate::actions::ActionOutcome;
use crate::form::{EncodeStatus, QrForm};
use serde_json::{Map, Value, json};

/// Combined structured and human-readable representation of the form result
#[derive(Debug, Clone)]
pub struct RenderedResult {
    /// Structured JSON representation suitable for downstream consumers
    pub json: Value,
    /// Human-readable lines for terminal presentation
    pub human: Vec<String>,
}

/// Named action outcomes to include in the output
pub type ActionReport = Vec<(&'static str, ActionOutcome)>;

/// Render the form's current payload, image and the given action outcomes.
pub fn render_form(form: &QrForm, actions: &ActionReport, data_uri: bool) -> RenderedResult {
    let kind = form.kind();
    let payload = form.payload();
    let version = form.version();
    let status = form.status();
    let image = form.image();

    let mut root = Map::new();
    root.insert("kind".to_string(), Value::String(kind.to_string()));
    root.insert("payload".to_string(), Value::String(payload.clone()));
    root.insert("version".to_string(), json!(version));
    root.insert("status".to_string(), json!(status));

    let mut human = Vec::new();
    human.push(format!("{} QR code", kind.label()));
    human.push("  Payload:".to_string());
    human.extend(payload.lines().map(|line| format!("    {line}")));
    if payload.is_empty() {
        human.push("    (empty)".to_string());
    }
    human.push(format!("  Status: {}", status_label(status)));

    match &image {
        Some(image) => {
            let mut obj = Map::new();
            obj.insert("width".to_string(), json!(image.image.width));
            obj.insert("bytes".to_string(), json!(image.png().len()));
            obj.insert("version".to_string(), json!(image.version));
            obj.insert("stale".to_string(), json!(image.version != version));
            human.push(format!(
                "  Image: {}x{} PNG, {} bytes",
                image.image.width,
                image.image.width,
                image.png().len()
            ));
            if image.version != version {
                human.push("  Image is from an earlier payload".to_string());
            }
            if data_uri {
                let uri = image.data_uri();
                human.push(format!("  Data URI: {uri}"));
                obj.insert("data_uri".to_string(), Value::String(uri));
            }
            root.insert("image".to_string(), Value::Object(obj));
        }
        None => {
            human.push("  Image: none".to_string());
            root.insert("image".to_string(), Value::Null);
        }
    }

    if !actions.is_empty() {
        let mut obj = Map::new();
        for (name, outcome) in actions {
            human.push(format!("  {}: {}", capitalize(name), outcome_label(outcome)));
            obj.insert((*name).to_string(), json!(outcome));
        }
        root.insert("actions".to_string(), Value::Object(obj));
    }

    RenderedResult {
        json: Value::Object(root),
        human,
    }
}

fn status_label(status: EncodeStatus) -> &'static str {
    match status {
        EncodeStatus::Idle => "idle",
        EncodeStatus::Encoding => "encoding",
        EncodeStatus::Encoded => "encoded",
        EncodeStatus::EncodeFailed => "encode failed",
    }
}

/// Short human description of an action outcome.
pub fn outcome_label(outcome: &ActionOutcome) -> String {
    match outcome {
        ActionOutcome::Saved { path } => format!("saved to {}", path.display()),
        ActionOutcome::Copied => "copied to clipboard".to_string(),
        ActionOutcome::Shared => "shared".to_string(),
        ActionOutcome::NoImage => "skipped, no image yet".to_string(),
        ActionOutcome::Unavailable => "not available".to_string(),
        ActionOutcome::Failed { message } => format!("failed ({message})"),
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::payload::DataKind;
    use crate::qr::{EncodedImage, Encoder};
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::path::PathBuf;
    use std::sync::Arc;

    struct FixedEncoder;

    #[async_trait]
    impl Encoder for FixedEncoder {
        async fn encode(&self, _text: &str) -> Result<EncodedImage> {
            Ok(EncodedImage {
                png: Bytes::from_static(b"\x89PNG"),
                width: 300,
            })
        }
    }

    #[tokio::test]
    async fn renders_json_and_human_lines() {
        let form = QrForm::new(Arc::new(FixedEncoder)).unwrap();
        form.set_kind(DataKind::Contact);
        form.set_field("first_name", "Jane").unwrap();
        form.settled().await;

        let actions: ActionReport = vec![(
            "download",
            ActionOutcome::Saved {
                path: PathBuf::from("out/qr-code-contact.png"),
            },
        )];
        let rendered = render_form(&form, &actions, true);

        assert_eq!(rendered.json["kind"], "contact");
        assert_eq!(rendered.json["status"], "encoded");
        assert_eq!(rendered.json["image"]["width"], 300);
        assert_eq!(rendered.json["image"]["stale"], false);
        assert_eq!(
            rendered.json["image"]["data_uri"],
            "data:image/png;base64,iVBORw=="
        );
        assert_eq!(rendered.json["actions"]["download"]["outcome"], "saved");

        assert_eq!(rendered.human[0], "Contact QR code");
        assert!(rendered.human.contains(&"    BEGIN:VCARD".to_string()));
        assert!(
            rendered
                .human
                .contains(&"  Download: saved to out/qr-code-contact.png".to_string())
        );
    }

    #[test]
    fn capitalizes_action_names() {
        assert_eq!(capitalize("share"), "Share");
        assert_eq!(capitalize(""), "");
    }
}
