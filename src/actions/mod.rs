//! Download, copy and share actions on the displayed image
//!
//! Each action reads the form's current [`RenderedImage`](crate::form::RenderedImage)
//! and hands it to a platform collaborator. Failures become notices on the
//! form's notice channel; nothing is returned as an error and no form state
//! is touched.

mod platform;

pub use platform::{
    Clipboard, CommandClipboard, CommandShare, DirectorySaver, FileSaver, NoShare, Share,
    ShareRequest,
};

use crate::form::QrForm;
use crate::notice::{Notice, NoticeKind};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Result of one action invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ActionOutcome {
    /// Image saved to disk
    Saved {
        /// Where the file was written
        path: PathBuf,
    },
    /// Image placed on the clipboard
    Copied,
    /// Share surface accepted the image
    Shared,
    /// No image rendered yet; nothing happened
    NoImage,
    /// Share surface not present on this platform
    Unavailable,
    /// Collaborator failed; a notice was published
    Failed {
        /// Failure detail
        message: String,
    },
}

/// Action handlers bound to their platform collaborators
#[derive(Clone)]
pub struct Actions {
    saver: Arc<dyn FileSaver>,
    clipboard: Arc<dyn Clipboard>,
    share: Arc<dyn Share>,
}

impl Actions {
    /// Bind handlers to the given collaborators.
    pub fn new(
        saver: Arc<dyn FileSaver>,
        clipboard: Arc<dyn Clipboard>,
        share: Arc<dyn Share>,
    ) -> Self {
        Self {
            saver,
            clipboard,
            share,
        }
    }

    /// Whether a share surface exists; callers hide the share action when it doesn't.
    pub fn can_share(&self) -> bool {
        self.share.is_available()
    }

    /// Save the image as `qr-code-<kind>.png`.
    pub async fn download(&self, form: &QrForm) -> ActionOutcome {
        let Some(image) = form.image() else {
            return ActionOutcome::NoImage;
        };

        let path = self
            .saver
            .save(&image.download_name(), image.image.png.clone())
            .await;
        tracing::info!(path = %path.display(), "saved QR code");
        ActionOutcome::Saved { path }
    }

    /// Put the image on the clipboard.
    pub async fn copy(&self, form: &QrForm) -> ActionOutcome {
        let Some(image) = form.image() else {
            return ActionOutcome::NoImage;
        };

        match self.clipboard.write_image(image.image.png.clone()).await {
            Ok(()) => {
                tracing::info!("copied QR code to clipboard");
                ActionOutcome::Copied
            }
            Err(err) => {
                let message = err.to_string();
                form.notices()
                    .publish(Notice::new(NoticeKind::ClipboardFailure, message.clone()));
                ActionOutcome::Failed { message }
            }
        }
    }

    /// Hand the image to the platform share surface.
    pub async fn share(&self, form: &QrForm) -> ActionOutcome {
        if !self.share.is_available() {
            return ActionOutcome::Unavailable;
        }
        let Some(image) = form.image() else {
            return ActionOutcome::NoImage;
        };

        let request = ShareRequest {
            title: format!("{} QR code", image.kind.label()),
            file_name: image.download_name(),
            png: image.image.png.clone(),
        };

        match self.share.share(request).await {
            Ok(()) => {
                tracing::info!("shared QR code");
                ActionOutcome::Shared
            }
            Err(err) => {
                let message = err.to_string();
                form.notices()
                    .publish(Notice::new(NoticeKind::ShareFailure, message.clone()));
                ActionOutcome::Failed { message }
            }
        }
    }
}
