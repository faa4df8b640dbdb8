//! qrshape runtime configuration handling

use crate::error::{Error, Result};
use crate::qr::{Color, Correction, RenderOptions};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level configuration structure read from disk or environment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QrshapeConfig {
    /// Encoder options
    pub render: RenderOptions,
    /// Logging configuration
    pub logging: LoggingOptions,
    /// Where and how results are written
    pub output: OutputOptions,
    /// Clipboard and share commands
    pub platform: PlatformOptions,
    /// File the configuration was read from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl QrshapeConfig {
    /// Load configuration from an explicit path or fall back to discovered defaults.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let source = match explicit_path {
            Some(path) => Some(path.to_path_buf()),
            None => Self::discover_file()?,
        };
        let mut config = match &source {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        // Logging is not up yet; the caller reports `source` once it is.
        config.source = source;

        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Attempt to locate a configuration file in common locations.
    fn discover_file() -> Result<Option<PathBuf>> {
        let cwd =
            env::current_dir().map_err(|e| Error::Config(format!("Failed to read cwd: {e}")))?;
        for candidate in ["qrshape.toml", "qrshape.yaml", "qrshape.yml"] {
            let path = cwd.join(candidate);
            if path.exists() {
                return Ok(Some(path));
            }
        }

        if let Some(xdg_config) = env::var_os("XDG_CONFIG_HOME") {
            let base = PathBuf::from(xdg_config).join("qrshape");
            for candidate in ["config.toml", "config.yaml"] {
                let path = base.join(candidate);
                if path.exists() {
                    return Ok(Some(path));
                }
            }
        }

        Ok(None)
    }

    /// Read configuration from a concrete file path.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {e}", path.display())))?;

        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_ascii_lowercase()
            .as_str()
        {
            "toml" => toml::from_str(&contents).map_err(|e| {
                Error::Config(format!("Failed to parse TOML {}: {e}", path.display()))
            }),
            "yaml" | "yml" => serde_yaml::from_str(&contents).map_err(|e| {
                Error::Config(format!("Failed to parse YAML {}: {e}", path.display()))
            }),
            other => Err(Error::Config(format!(
                "Unsupported config format '{}', expected toml/yaml",
                other
            ))),
        }
    }

    /// Apply environment variable overrides after file/default loading.
    fn apply_env_overrides(&mut self) -> Result<()> {
        apply_render_env(&mut self.render)?;
        self.logging.apply_env_overrides();
        self.output.apply_env_overrides();
        self.platform.apply_env_overrides();
        Ok(())
    }
}

fn apply_render_env(render: &mut RenderOptions) -> Result<()> {
    if let Ok(width) = env::var("QRSHAPE_WIDTH") {
        if let Ok(parsed) = width.parse::<u32>() {
            render.width = parsed.max(1);
        }
    }
    if let Ok(margin) = env::var("QRSHAPE_MARGIN") {
        if let Ok(parsed) = margin.parse::<u32>() {
            render.margin = parsed;
        }
    }
    if let Ok(dark) = env::var("QRSHAPE_DARK") {
        render.dark = dark.parse::<Color>()?;
    }
    if let Ok(light) = env::var("QRSHAPE_LIGHT") {
        render.light = light.parse::<Color>()?;
    }
    if let Ok(level) = env::var("QRSHAPE_CORRECTION") {
        render.correction = level.parse::<Correction>().map_err(Error::Config)?;
    }
    if let Ok(verify) = env::var("QRSHAPE_VERIFY") {
        if let Some(flag) = parse_switch(&verify) {
            render.verify = flag;
        }
    }
    Ok(())
}

fn parse_switch(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "on" => Some(true),
        "0" | "false" | "off" => Some(false),
        _ => None,
    }
}

/// Structured logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingOptions {
    /// Default log level (overridable via `QRSHAPE_LOG_LEVEL`)
    pub level: String,
    /// Optional log file path for teeing structured logs
    pub file: Option<PathBuf>,
    /// Force ANSI colors in stderr logging
    pub color: bool,
    /// Optional log rotation strategy applied to `file`
    pub rotation: Option<LogRotation>,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
            color: true,
            rotation: None,
        }
    }
}

impl LoggingOptions {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(level) = env::var("QRSHAPE_LOG_LEVEL") {
            self.level = level;
        }
        if let Ok(file) = env::var("QRSHAPE_LOG_FILE") {
            self.file = Some(PathBuf::from(file));
        }
        if let Ok(color) = env::var("QRSHAPE_LOG_COLOR") {
            if let Some(flag) = parse_switch(&color) {
                self.color = flag;
            }
        }
        if let Ok(rotation) = env::var("QRSHAPE_LOG_ROTATION") {
            if let Some(parsed) = LogRotation::parse(&rotation) {
                self.rotation = Some(parsed);
            }
        }
    }
}

/// Supported log rotation policies for file sinks
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    /// Rotate log files once per hour
    Hourly,
    /// Rotate log files once per day
    Daily,
}

impl LogRotation {
    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "hourly" => Some(Self::Hourly),
            "daily" => Some(Self::Daily),
            _ => None,
        }
    }
}

/// Result output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    /// Directory that downloads are saved into
    pub dir: PathBuf,
    /// Print JSON instead of human-readable lines
    pub json: bool,
    /// Include the `data:` URI of the image in output
    pub data_uri: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            json: false,
            data_uri: false,
        }
    }
}

impl OutputOptions {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(dir) = env::var("QRSHAPE_OUT_DIR") {
            if !dir.trim().is_empty() {
                self.dir = PathBuf::from(dir);
            }
        }
        if let Ok(json) = env::var("QRSHAPE_JSON") {
            if let Some(flag) = parse_switch(&json) {
                self.json = flag;
            }
        }
    }
}

/// Commands backing the clipboard and share collaborators
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformOptions {
    /// Clipboard command reading PNG on stdin; empty means auto-detect
    pub clipboard_command: Vec<String>,
    /// Share command receiving the image path as last argument; empty disables sharing
    pub share_command: Vec<String>,
}

impl PlatformOptions {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(command) = env::var("QRSHAPE_CLIPBOARD_COMMAND") {
            self.clipboard_command = split_command(&command);
        }
        if let Ok(command) = env::var("QRSHAPE_SHARE_COMMAND") {
            self.share_command = split_command(&command);
        }
    }
}

fn split_command(value: &str) -> Vec<String> {
    value.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(name: &str, contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn loads_toml() {
        let (_dir, path) = write_config(
            "qrshape.toml",
            r##"
[render]
width = 512
dark = "#0F172A"
correction = "H"

[output]
dir = "/tmp/codes"

[platform]
share_command = ["xdg-open"]
"##,
        );
        let config = QrshapeConfig::from_file(&path).unwrap();
        assert_eq!(config.render.width, 512);
        assert_eq!(config.render.margin, 2);
        assert_eq!(config.render.dark, Color([0x0f, 0x17, 0x2a, 255]));
        assert_eq!(config.render.correction, Correction::H);
        assert_eq!(config.output.dir, PathBuf::from("/tmp/codes"));
        assert_eq!(config.platform.share_command, vec!["xdg-open"]);
    }

    #[test]
    fn loads_yaml() {
        let (_dir, path) = write_config(
            "qrshape.yaml",
            "logging:\n  level: debug\n  rotation: daily\nrender:\n  margin: 4\n",
        );
        let config = QrshapeConfig::from_file(&path).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.rotation, Some(LogRotation::Daily));
        assert_eq!(config.render.margin, 4);
        assert_eq!(config.render.width, 300);
    }

    #[test]
    fn load_records_explicit_source() {
        let (_dir, path) = write_config("custom.toml", "[render]\nwidth = 200\n");
        let config = QrshapeConfig::load(Some(path.as_path())).unwrap();
        assert_eq!(config.source.as_deref(), Some(path.as_path()));
        assert!(QrshapeConfig::default().source.is_none());
    }

    #[test]
    fn rejects_unknown_extension() {
        let (_dir, path) = write_config("qrshape.ini", "width=1");
        assert!(matches!(
            QrshapeConfig::from_file(&path),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn rejects_bad_color() {
        let (_dir, path) = write_config("qrshape.toml", "[render]\nlight = \"white\"\n");
        assert!(QrshapeConfig::from_file(&path).is_err());
    }

    #[test]
    fn splits_commands_on_whitespace() {
        assert_eq!(
            split_command("wl-copy  --type image/png"),
            vec!["wl-copy", "--type", "image/png"]
        );
        assert!(split_command("   ").is_empty());
    }
}
