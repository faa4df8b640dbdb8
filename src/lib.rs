//! qrshape - typed QR payloads rendered to PNG
//!
//! Pick a data shape (URL, text, email, phone, SMS, contact card, WiFi),
//! fill in its fields, and get back the formatted payload together with a
//! rendered QR image that can be saved, copied or shared.
//!
//! # Features
//!
//! - **Payload formatting**: `mailto:`, `tel:`, `sms:`, vCard 3.0 and `WIFI:` strings
//! - **Reactive form**: every edit recomputes the payload and re-encodes the image
//! - **Ordered encoding**: results for outdated payloads are discarded
//! - **Actions**: download, clipboard copy and share through local tools
//!
//! # Example
//!
//! ```no_run
//! use qrshape::{DataKind, QrEncoder, QrForm};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> qrshape::Result<()> {
//!     let form = QrForm::new(Arc::new(QrEncoder::new()))?;
//!     form.set_kind(DataKind::Wifi);
//!     form.set_field("ssid", "HomeNet")?;
//!     form.set_field("password", "hunter2")?;
//!
//!     form.settled().await;
//!     println!("{}", form.payload());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs, rust_2024_compatibility)]

pub mod actions;
pub mod config;
pub mod error;
pub mod form;
pub mod logging;
pub mod notice;
pub mod output;
pub mod payload;
pub mod qr;

// Re-exports for convenience
pub use error::{Error, Result};

pub use actions::{ActionOutcome, Actions};
pub use config::{LogRotation, LoggingOptions, OutputOptions, PlatformOptions, QrshapeConfig};
pub use form::{EncodeStatus, PayloadVersion, QrForm, RenderedImage, Toggles};
pub use notice::{Notice, NoticeKind};
pub use payload::{DataKind, FormRecords, Record};
pub use qr::{EncodedImage, Encoder, QrEncoder, RenderOptions};
