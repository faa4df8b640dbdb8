use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;

use qrshape::actions::{
    ActionOutcome, Actions, Clipboard, DirectorySaver, FileSaver, NoShare, Share, ShareRequest,
};
use qrshape::qr::{EncodedImage, Encoder};
use qrshape::{DataKind, EncodeStatus, Error, NoticeKind, QrEncoder, QrForm, Result};

/// Encoder that never finishes, so the form never has an image.
struct StalledEncoder;

#[async_trait]
impl Encoder for StalledEncoder {
    async fn encode(&self, _text: &str) -> Result<EncodedImage> {
        std::future::pending().await
    }
}

#[derive(Default)]
struct RecordingClipboard {
    writes: Mutex<Vec<Bytes>>,
    fail: bool,
}

#[async_trait]
impl Clipboard for RecordingClipboard {
    async fn write_image(&self, png: Bytes) -> Result<()> {
        if self.fail {
            return Err(Error::Clipboard("permission denied".to_string()));
        }
        self.writes.lock().unwrap().push(png);
        Ok(())
    }
}

#[derive(Default)]
struct RecordingShare {
    requests: Mutex<Vec<ShareRequest>>,
    fail: bool,
}

#[async_trait]
impl Share for RecordingShare {
    fn is_available(&self) -> bool {
        true
    }

    async fn share(&self, request: ShareRequest) -> Result<()> {
        if self.fail {
            return Err(Error::Share("cancelled by user".to_string()));
        }
        self.requests.lock().unwrap().push(request);
        Ok(())
    }
}

#[derive(Default)]
struct RecordingSaver {
    saved: Mutex<Vec<(String, Bytes)>>,
}

#[async_trait]
impl FileSaver for RecordingSaver {
    async fn save(&self, file_name: &str, data: Bytes) -> std::path::PathBuf {
        self.saved
            .lock()
            .unwrap()
            .push((file_name.to_string(), data));
        std::path::PathBuf::from(file_name)
    }
}

#[tokio::test]
async fn actions_without_image_are_noops() {
    let form = QrForm::new(Arc::new(StalledEncoder)).unwrap();
    let saver = Arc::new(RecordingSaver::default());
    let clipboard = Arc::new(RecordingClipboard::default());
    let share = Arc::new(RecordingShare::default());
    let actions = Actions::new(saver.clone(), clipboard.clone(), share.clone());
    let mut notices = form.subscribe_notices();

    let version = form.version();
    let payload = form.payload();
    let records = form.records();

    assert_eq!(actions.download(&form).await, ActionOutcome::NoImage);
    assert_eq!(actions.copy(&form).await, ActionOutcome::NoImage);
    assert_eq!(actions.share(&form).await, ActionOutcome::NoImage);

    assert!(saver.saved.lock().unwrap().is_empty());
    assert!(clipboard.writes.lock().unwrap().is_empty());
    assert!(share.requests.lock().unwrap().is_empty());
    assert!(notices.try_recv().is_err());

    assert_eq!(form.version(), version);
    assert_eq!(form.payload(), payload);
    assert_eq!(form.records(), records);
    assert_eq!(form.status(), EncodeStatus::Encoding);
}

#[tokio::test]
async fn download_writes_kind_named_png() {
    let dir = tempfile::tempdir().unwrap();
    let form = QrForm::new(Arc::new(QrEncoder::new())).unwrap();
    form.set_kind(DataKind::Wifi);
    form.set_field("ssid", "Net").unwrap();
    assert_eq!(form.settled().await, EncodeStatus::Encoded);

    let actions = Actions::new(
        Arc::new(DirectorySaver::new(dir.path())),
        Arc::new(RecordingClipboard::default()),
        Arc::new(NoShare),
    );

    let outcome = actions.download(&form).await;
    let expected = dir.path().join("qr-code-wifi.png");
    assert_eq!(
        outcome,
        ActionOutcome::Saved {
            path: expected.clone()
        }
    );

    let saved = image::open(&expected).unwrap();
    assert_eq!(saved.width(), 300);
    assert_eq!(form.kind(), DataKind::Wifi);
}

#[tokio::test]
async fn download_name_follows_kind_when_payload_text_matches() {
    let dir = tempfile::tempdir().unwrap();
    let form = QrForm::new(Arc::new(QrEncoder::new())).unwrap();
    form.set_field("url", "hello").unwrap();
    form.set_kind(DataKind::Text);
    form.set_field("text", "hello").unwrap();
    form.set_kind(DataKind::Url);
    assert_eq!(form.settled().await, EncodeStatus::Encoded);

    let actions = Actions::new(
        Arc::new(DirectorySaver::new(dir.path())),
        Arc::new(RecordingClipboard::default()),
        Arc::new(NoShare),
    );

    assert_eq!(form.image().unwrap().kind, DataKind::Url);
    assert_eq!(
        actions.download(&form).await,
        ActionOutcome::Saved {
            path: dir.path().join("qr-code-url.png")
        }
    );
}

#[tokio::test]
async fn copy_places_png_on_clipboard() {
    let form = QrForm::new(Arc::new(QrEncoder::new())).unwrap();
    form.settled().await;
    let clipboard = Arc::new(RecordingClipboard::default());
    let actions = Actions::new(
        Arc::new(RecordingSaver::default()),
        clipboard.clone(),
        Arc::new(NoShare),
    );

    assert_eq!(actions.copy(&form).await, ActionOutcome::Copied);
    let writes = clipboard.writes.lock().unwrap();
    assert_eq!(writes.len(), 1);
    assert_eq!(&writes[0][..], form.image().unwrap().png());
}

#[tokio::test]
async fn copy_failure_publishes_notice_and_keeps_state() {
    let form = QrForm::new(Arc::new(QrEncoder::new())).unwrap();
    form.settled().await;
    let image = form.image();
    let mut notices = form.subscribe_notices();

    let actions = Actions::new(
        Arc::new(RecordingSaver::default()),
        Arc::new(RecordingClipboard {
            fail: true,
            ..Default::default()
        }),
        Arc::new(NoShare),
    );

    let outcome = actions.copy(&form).await;
    assert!(matches!(outcome, ActionOutcome::Failed { .. }));
    let notice = notices.recv().await.unwrap();
    assert_eq!(notice.kind, NoticeKind::ClipboardFailure);
    assert_eq!(form.image(), image);
}

#[tokio::test]
async fn share_is_silent_when_unavailable() {
    let form = QrForm::new(Arc::new(QrEncoder::new())).unwrap();
    form.settled().await;
    let mut notices = form.subscribe_notices();
    let actions = Actions::new(
        Arc::new(RecordingSaver::default()),
        Arc::new(RecordingClipboard::default()),
        Arc::new(NoShare),
    );

    assert!(!actions.can_share());
    assert_eq!(actions.share(&form).await, ActionOutcome::Unavailable);
    assert!(notices.try_recv().is_err());
}

#[tokio::test]
async fn share_sends_titled_attachment() {
    let form = QrForm::new(Arc::new(QrEncoder::new())).unwrap();
    form.set_kind(DataKind::Sms);
    form.settled().await;
    let share = Arc::new(RecordingShare::default());
    let actions = Actions::new(
        Arc::new(RecordingSaver::default()),
        Arc::new(RecordingClipboard::default()),
        share.clone(),
    );

    assert_eq!(actions.share(&form).await, ActionOutcome::Shared);
    let requests = share.requests.lock().unwrap();
    assert_eq!(requests[0].file_name, "qr-code-sms.png");
    assert_eq!(requests[0].title, "SMS QR code");
}

#[tokio::test]
async fn share_failure_publishes_notice() {
    let form = QrForm::new(Arc::new(QrEncoder::new())).unwrap();
    form.settled().await;
    let mut notices = form.subscribe_notices();
    let actions = Actions::new(
        Arc::new(RecordingSaver::default()),
        Arc::new(RecordingClipboard::default()),
        Arc::new(RecordingShare {
            fail: true,
            ..Default::default()
        }),
    );

    assert!(matches!(
        actions.share(&form).await,
        ActionOutcome::Failed { .. }
    ));
    assert_eq!(
        notices.recv().await.unwrap().kind,
        NoticeKind::ShareFailure
    );
}
