//! The reactive form: records in, payload and image out
//!
//! Every mutation recomputes the payload synchronously. When the payload
//! changes its version is bumped and an encode is spawned for it. Encode
//! results are applied only while their version is still current, so a slow
//! encode for an old payload can never overwrite a newer one.

use crate::error::{Error, Result};
use crate::notice::{Notice, NoticeKind, Notices};
use crate::payload::{DataKind, FormRecords, Record};
use crate::qr::{EncodedImage, Encoder};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::runtime::Handle;
use tokio::sync::{broadcast, watch};

/// Monotonic counter identifying one payload value
pub type PayloadVersion = u64;

/// Encoder status for the current payload version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodeStatus {
    /// Nothing requested yet
    Idle,
    /// Encode in flight for the current version
    Encoding,
    /// Current version rendered successfully
    Encoded,
    /// Encoder rejected the current version; previous image kept
    EncodeFailed,
}

/// Placeholder toggles shown next to the form. Nothing reads them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Toggles {
    /// "Track scans"
    pub track_scans: bool,
    /// "Remove watermark"
    pub remove_watermark: bool,
}

/// The image currently on display, with the inputs it was rendered from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    /// Payload version this image belongs to
    pub version: PayloadVersion,
    /// Kind that was active when the payload was formatted
    pub kind: DataKind,
    /// Encoded payload text
    pub payload: String,
    /// PNG output
    pub image: EncodedImage,
}

impl RenderedImage {
    /// PNG bytes
    pub fn png(&self) -> &[u8] {
        &self.image.png
    }

    /// `data:` URI for embedding
    pub fn data_uri(&self) -> String {
        self.image.data_uri()
    }

    /// `qr-code-<kind>.png`
    pub fn download_name(&self) -> String {
        self.kind.download_name()
    }
}

struct FormState {
    kind: DataKind,
    records: FormRecords,
    toggles: Toggles,
    payload: String,
    payload_kind: DataKind,
    version: PayloadVersion,
    status: EncodeStatus,
    image: Option<RenderedImage>,
}

struct FormInner {
    encoder: Arc<dyn Encoder>,
    runtime: Handle,
    state: Mutex<FormState>,
    status: watch::Sender<(PayloadVersion, EncodeStatus)>,
    notices: Notices,
}

/// One form instance. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct QrForm {
    inner: Arc<FormInner>,
}

impl std::fmt::Debug for QrForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state();
        f.debug_struct("QrForm")
            .field("kind", &state.kind)
            .field("version", &state.version)
            .field("status", &state.status)
            .finish()
    }
}

impl QrForm {
    /// Create a form with default records and start encoding the initial payload.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(encoder: Arc<dyn Encoder>) -> Result<Self> {
        Self::with_records(encoder, DataKind::default(), FormRecords::default())
    }

    /// Create a form pre-filled with `records`, showing `kind`.
    pub fn with_records(
        encoder: Arc<dyn Encoder>,
        kind: DataKind,
        records: FormRecords,
    ) -> Result<Self> {
        let runtime = Handle::try_current()
            .map_err(|e| Error::Other(format!("QrForm requires a Tokio runtime: {e}")))?;
        let (status, _) = watch::channel((0, EncodeStatus::Idle));

        let form = Self {
            inner: Arc::new(FormInner {
                encoder,
                runtime,
                state: Mutex::new(FormState {
                    kind,
                    records,
                    toggles: Toggles::default(),
                    payload: String::new(),
                    payload_kind: kind,
                    version: 0,
                    status: EncodeStatus::Idle,
                    image: None,
                }),
                status,
                notices: Notices::new(),
            }),
        };

        {
            let mut state = form.inner.state();
            form.recompute(&mut state, true);
        }
        Ok(form)
    }

    /// Active kind
    pub fn kind(&self) -> DataKind {
        self.inner.state().kind
    }

    /// Copy of every record
    pub fn records(&self) -> FormRecords {
        self.inner.state().records.clone()
    }

    /// Current payload text
    pub fn payload(&self) -> String {
        self.inner.state().payload.clone()
    }

    /// Current payload version
    pub fn version(&self) -> PayloadVersion {
        self.inner.state().version
    }

    /// Encoder status for the current version
    pub fn status(&self) -> EncodeStatus {
        self.inner.state().status
    }

    /// Image on display, if any encode has succeeded yet
    pub fn image(&self) -> Option<RenderedImage> {
        self.inner.state().image.clone()
    }

    /// Placeholder toggles
    pub fn toggles(&self) -> Toggles {
        self.inner.state().toggles
    }

    /// Store the placeholder toggles. Has no effect on payload or image.
    pub fn set_toggles(&self, toggles: Toggles) {
        self.inner.state().toggles = toggles;
    }

    /// Switch the active kind.
    pub fn set_kind(&self, kind: DataKind) {
        let mut state = self.inner.state();
        if state.kind != kind {
            tracing::debug!(from = %state.kind, to = %kind, "switching data kind");
            state.kind = kind;
            self.recompute(&mut state, false);
        }
    }

    /// Assign one field of the active record.
    pub fn set_field(&self, name: &str, value: &str) -> Result<()> {
        let mut state = self.inner.state();
        let kind = state.kind;
        state.records.set_field(kind, name, value)?;
        self.recompute(&mut state, false);
        Ok(())
    }

    /// Replace the record for its kind (which need not be the active one).
    pub fn set_record(&self, record: Record) {
        let mut state = self.inner.state();
        state.records.replace(record);
        self.recompute(&mut state, false);
    }

    /// Mutate records in place.
    pub fn edit<F>(&self, f: F)
    where
        F: FnOnce(&mut FormRecords),
    {
        let mut state = self.inner.state();
        f(&mut state.records);
        self.recompute(&mut state, false);
    }

    /// Subscribe to user-visible notices.
    pub fn subscribe_notices(&self) -> broadcast::Receiver<Notice> {
        self.inner.notices.subscribe()
    }

    /// Notice channel shared with action handlers.
    pub fn notices(&self) -> &Notices {
        &self.inner.notices
    }

    /// Wait until the current version is no longer encoding and return its status.
    pub async fn settled(&self) -> EncodeStatus {
        let mut rx = self.inner.status.subscribe();
        loop {
            let current = self.version();
            {
                let (version, status) = *rx.borrow_and_update();
                if version == current && status != EncodeStatus::Encoding {
                    return status;
                }
            }
            if rx.changed().await.is_err() {
                return self.status();
            }
        }
    }

    fn recompute(&self, state: &mut FormState, force: bool) {
        let payload = state.records.payload(state.kind);
        // Same text under another kind still needs a new image labelled with that kind.
        if !force && payload == state.payload && state.kind == state.payload_kind {
            return;
        }

        state.payload = payload.clone();
        state.payload_kind = state.kind;
        state.version += 1;
        state.status = EncodeStatus::Encoding;
        let version = state.version;
        let kind = state.kind;
        self.inner
            .status
            .send_replace((version, EncodeStatus::Encoding));

        tracing::debug!(version, %kind, bytes = payload.len(), "payload changed, encoding");

        let inner = Arc::clone(&self.inner);
        self.inner.runtime.spawn(async move {
            let result = inner.encoder.encode(&payload).await;
            inner.complete(version, kind, payload, result);
        });
    }
}

impl FormInner {
    fn state(&self) -> MutexGuard<'_, FormState> {
        self.state.lock().expect("form state mutex poisoned")
    }

    fn complete(
        &self,
        version: PayloadVersion,
        kind: DataKind,
        payload: String,
        result: Result<EncodedImage>,
    ) {
        let notice = {
            let mut state = self.state();
            if state.version != version {
                tracing::debug!(
                    version,
                    current = state.version,
                    "discarding stale encode result"
                );
                return;
            }

            let notice = match result {
                Ok(image) => {
                    tracing::debug!(version, bytes = image.png.len(), "encode finished");
                    state.image = Some(RenderedImage {
                        version,
                        kind,
                        payload,
                        image,
                    });
                    state.status = EncodeStatus::Encoded;
                    None
                }
                Err(err) => {
                    state.status = EncodeStatus::EncodeFailed;
                    Some(Notice::new(NoticeKind::EncodeFailure, err.to_string()))
                }
            };
            self.status.send_replace((version, state.status));
            notice
        };

        if let Some(notice) = notice {
            self.notices.publish(notice);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::{PhoneRecord, URL_PLACEHOLDER};
    use async_trait::async_trait;
    use bytes::Bytes;

    /// Encoder that echoes the payload into the "PNG" bytes.
    struct EchoEncoder;

    #[async_trait]
    impl Encoder for EchoEncoder {
        async fn encode(&self, text: &str) -> Result<EncodedImage> {
            if text.contains("reject") {
                return Err(Error::Encode("data too long".to_string()));
            }
            Ok(EncodedImage {
                png: Bytes::copy_from_slice(text.as_bytes()),
                width: 1,
            })
        }
    }

    fn echo_form() -> QrForm {
        QrForm::new(Arc::new(EchoEncoder)).unwrap()
    }

    #[tokio::test]
    async fn initial_payload_is_url_placeholder() {
        let form = echo_form();
        assert_eq!(form.kind(), DataKind::Url);
        assert_eq!(form.payload(), URL_PLACEHOLDER);
        assert_eq!(form.settled().await, EncodeStatus::Encoded);
        assert_eq!(form.image().unwrap().png(), URL_PLACEHOLDER.as_bytes());
    }

    #[tokio::test]
    async fn editing_recomputes_payload_and_image() {
        let form = echo_form();
        form.set_kind(DataKind::Phone);
        form.set_field("number", "555").unwrap();
        assert_eq!(form.payload(), "tel:555");
        assert_eq!(form.settled().await, EncodeStatus::Encoded);

        let image = form.image().unwrap();
        assert_eq!(image.payload, "tel:555");
        assert_eq!(image.kind, DataKind::Phone);
        assert_eq!(image.version, form.version());
    }

    #[tokio::test]
    async fn unchanged_payload_does_not_bump_version() {
        let form = echo_form();
        let version = form.version();
        form.set_field("url", "").unwrap();
        form.set_kind(DataKind::Url);
        assert_eq!(form.version(), version);
    }

    #[tokio::test]
    async fn kind_switch_with_identical_payload_reencodes() {
        let form = echo_form();
        form.set_field("url", "hello").unwrap();
        form.set_kind(DataKind::Text);
        form.set_field("text", "hello").unwrap();
        form.settled().await;
        let version = form.version();

        form.set_kind(DataKind::Url);
        assert_eq!(form.payload(), "hello");
        assert_eq!(form.version(), version + 1);
        assert_eq!(form.settled().await, EncodeStatus::Encoded);
        assert_eq!(form.image().unwrap().kind, DataKind::Url);
    }

    #[tokio::test]
    async fn inactive_record_edits_do_not_change_payload() {
        let form = echo_form();
        let version = form.version();
        form.set_record(Record::Phone(PhoneRecord {
            number: "123".to_string(),
        }));
        assert_eq!(form.version(), version);
        form.set_kind(DataKind::Phone);
        assert_eq!(form.payload(), "tel:123");
    }

    #[tokio::test]
    async fn encode_failure_keeps_previous_image_and_notifies() {
        let form = echo_form();
        let mut notices = form.subscribe_notices();
        form.set_kind(DataKind::Text);
        form.settled().await;
        let before = form.image().unwrap();

        form.set_field("text", "please reject this").unwrap();
        assert_eq!(form.settled().await, EncodeStatus::EncodeFailed);
        assert_eq!(form.image(), Some(before));

        let notice = notices.recv().await.unwrap();
        assert_eq!(notice.kind, NoticeKind::EncodeFailure);
    }

    #[tokio::test]
    async fn toggles_are_inert() {
        let form = echo_form();
        let version = form.version();
        form.set_toggles(Toggles {
            track_scans: true,
            remove_watermark: true,
        });
        assert!(form.toggles().track_scans);
        assert_eq!(form.version(), version);
    }

    #[test]
    fn new_outside_runtime_is_an_error() {
        assert!(matches!(
            QrForm::new(Arc::new(EchoEncoder)),
            Err(Error::Other(_))
        ));
    }
}
