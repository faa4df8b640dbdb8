//! Local platform collaborators: file save, clipboard, share

use crate::error::{Error, Result};
use async_trait::async_trait;
use bytes::Bytes;
use std::env;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Saves files locally. Fire-and-forget: problems are logged, not returned.
#[async_trait]
pub trait FileSaver: Send + Sync {
    /// Save `data` under `file_name` and return the intended path.
    async fn save(&self, file_name: &str, data: Bytes) -> PathBuf;
}

/// Places image data on the system clipboard.
#[async_trait]
pub trait Clipboard: Send + Sync {
    /// Write PNG bytes as an `image/png` clipboard entry.
    async fn write_image(&self, png: Bytes) -> Result<()>;
}

/// What gets handed to the share surface
#[derive(Debug, Clone)]
pub struct ShareRequest {
    /// Title shown by the share surface
    pub title: String,
    /// Attachment file name
    pub file_name: String,
    /// Attachment contents
    pub png: Bytes,
}

/// Native share surface.
#[async_trait]
pub trait Share: Send + Sync {
    /// Feature detection; must be checked before [`Share::share`].
    fn is_available(&self) -> bool;

    /// Share the image as a file attachment.
    async fn share(&self, request: ShareRequest) -> Result<()>;
}

/// Writes files into one output directory, creating it on demand.
#[derive(Debug, Clone)]
pub struct DirectorySaver {
    dir: PathBuf,
}

impl DirectorySaver {
    /// Save into `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl FileSaver for DirectorySaver {
    async fn save(&self, file_name: &str, data: Bytes) -> PathBuf {
        let path = self.dir.join(file_name);
        if let Err(err) = write_file(&path, &data).await {
            tracing::warn!(path = %path.display(), "Failed to save file: {err}");
        }
        path
    }
}

async fn write_file(path: &Path, data: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    tokio::fs::write(path, data).await
}

/// Clipboard backed by an external tool reading PNG data on stdin.
#[derive(Debug, Clone)]
pub struct CommandClipboard {
    command: Vec<String>,
}

impl CommandClipboard {
    /// Use an explicit command line (program followed by arguments).
    pub fn new(command: Vec<String>) -> Self {
        Self { command }
    }

    /// `wl-copy` under Wayland, `xclip` otherwise.
    pub fn detect() -> Self {
        let command: &[&str] = if env::var_os("WAYLAND_DISPLAY").is_some() {
            &["wl-copy", "--type", "image/png"]
        } else {
            &["xclip", "-selection", "clipboard", "-t", "image/png", "-i"]
        };
        Self::new(command.iter().map(|s| s.to_string()).collect())
    }

    /// Configured command, if non-empty; otherwise [`CommandClipboard::detect`].
    pub fn from_config(command: &[String]) -> Self {
        if command.is_empty() {
            Self::detect()
        } else {
            Self::new(command.to_vec())
        }
    }

    /// Command line in use
    pub fn command(&self) -> &[String] {
        &self.command
    }
}

#[async_trait]
impl Clipboard for CommandClipboard {
    async fn write_image(&self, png: Bytes) -> Result<()> {
        let (program, args) = self
            .command
            .split_first()
            .ok_or_else(|| Error::Clipboard("no clipboard command configured".to_string()))?;

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::Clipboard(format!("cannot run '{program}': {e}")))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(&png)
                .await
                .map_err(|e| Error::Clipboard(format!("failed to write to '{program}': {e}")))?;
            // Close stdin so the tool sees EOF.
            drop(stdin);
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| Error::Clipboard(format!("'{program}' did not finish: {e}")))?;

        if output.status.success() {
            Ok(())
        } else {
            Err(Error::Clipboard(format!(
                "'{program}' exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )))
        }
    }
}

/// Share surface that runs a command with the staged image path appended.
#[derive(Debug, Clone)]
pub struct CommandShare {
    command: Vec<String>,
    staging: PathBuf,
}

impl CommandShare {
    /// Share with `command`, staging attachments in `staging`.
    pub fn new(command: Vec<String>, staging: impl Into<PathBuf>) -> Self {
        Self {
            command,
            staging: staging.into(),
        }
    }
}

#[async_trait]
impl Share for CommandShare {
    fn is_available(&self) -> bool {
        self.command
            .first()
            .is_some_and(|program| find_program(program).is_some())
    }

    async fn share(&self, request: ShareRequest) -> Result<()> {
        let (program, args) = self
            .command
            .split_first()
            .ok_or_else(|| Error::Share("no share command configured".to_string()))?;

        let path = self.staging.join(&request.file_name);
        write_file(&path, &request.png)
            .await
            .map_err(|e| Error::Share(format!("cannot stage {}: {e}", path.display())))?;

        tracing::debug!(title = %request.title, path = %path.display(), "sharing QR code");

        let status = Command::new(program)
            .args(args)
            .arg(&path)
            .env("QRSHAPE_SHARE_TITLE", &request.title)
            .stdin(Stdio::null())
            .status()
            .await
            .map_err(|e| Error::Share(format!("cannot run '{program}': {e}")))?;

        if status.success() {
            Ok(())
        } else {
            Err(Error::Share(format!("'{program}' exited with {status}")))
        }
    }
}

/// No share surface on this platform.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoShare;

#[async_trait]
impl Share for NoShare {
    fn is_available(&self) -> bool {
        false
    }

    async fn share(&self, _request: ShareRequest) -> Result<()> {
        Err(Error::Share("sharing is not supported here".to_string()))
    }
}

/// Resolve a program name against `PATH`; paths with a separator are checked directly.
pub(crate) fn find_program(program: &str) -> Option<PathBuf> {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }

    env::var_os("PATH").and_then(|paths| {
        env::split_paths(&paths)
            .map(|dir| dir.join(program))
            .find(|path| path.is_file())
    })
}
