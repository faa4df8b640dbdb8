//! qrshape command-line entrypoint

use clap::{Parser, Subcommand};
use qrshape::actions::{
    ActionOutcome, Actions, CommandClipboard, CommandShare, DirectorySaver, NoShare, Share,
};
use qrshape::output::{ActionReport, outcome_label, render_form};
use qrshape::payload::{
    ContactRecord, EmailRecord, PhoneRecord, SmsRecord, TextRecord, UrlRecord, WifiRecord,
};
use qrshape::{
    DataKind, Error, FormRecords, Notice, QrEncoder, QrForm, QrshapeConfig, Record, Result,
    Toggles, logging,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "qrshape",
    version,
    about = "Build typed QR payloads and render them to PNG"
)]
struct Cli {
    /// Optional configuration file (toml/yaml). Defaults to qrshape.{toml,yaml} in cwd/XDG config.
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Output results as formatted JSON instead of human-readable text
    #[arg(long, global = true)]
    json: bool,

    /// Directory that downloaded images are written to
    #[arg(long, value_name = "DIR", global = true)]
    out_dir: Option<PathBuf>,

    /// Output width in pixels
    #[arg(long, value_name = "PX", global = true)]
    width: Option<u32>,

    /// Quiet-zone margin in modules
    #[arg(long, value_name = "MODULES", global = true)]
    margin: Option<u32>,

    /// Include the image as a data: URI in the output
    #[arg(long, global = true)]
    data_uri: bool,

    /// Scan every rendered symbol back and check it matches the payload
    #[arg(long, global = true)]
    verify: bool,

    /// Save the image as qr-code-<kind>.png
    #[arg(long, global = true)]
    download: bool,

    /// Copy the image to the clipboard
    #[arg(long, global = true)]
    copy: bool,

    /// Hand the image to the configured share command
    #[arg(long, global = true)]
    share: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encode a URL
    Url {
        /// Target URL
        url: Option<String>,
    },
    /// Encode free text
    Text {
        /// Text to encode
        text: Option<String>,
    },
    /// Encode a mailto: link
    Email {
        /// Recipient address
        #[arg(long, default_value = "")]
        email: String,
        /// Subject line
        #[arg(long, default_value = "")]
        subject: String,
        /// Message body
        #[arg(long, default_value = "")]
        body: String,
    },
    /// Encode a tel: link
    Phone {
        /// Number to dial
        number: Option<String>,
    },
    /// Encode an sms: link
    Sms {
        /// Recipient number
        #[arg(long, default_value = "")]
        number: String,
        /// Message text
        #[arg(long, default_value = "")]
        message: String,
    },
    /// Encode a vCard 3.0 contact
    Contact {
        /// Given name
        #[arg(long, default_value = "")]
        first_name: String,
        /// Family name
        #[arg(long, default_value = "")]
        last_name: String,
        /// Organization
        #[arg(long, default_value = "")]
        organization: String,
        /// Job title
        #[arg(long, default_value = "")]
        title: String,
        /// Email address
        #[arg(long, default_value = "")]
        email: String,
        /// Phone number
        #[arg(long, default_value = "")]
        phone: String,
        /// Mobile number
        #[arg(long, default_value = "")]
        mobile: String,
    },
    /// Encode WiFi network credentials
    Wifi {
        /// Network name
        #[arg(long, default_value = "")]
        ssid: String,
        /// Network password
        #[arg(long, default_value = "")]
        password: String,
        /// Security type (WPA, WEP, nopass, ...)
        #[arg(long, default_value = "WPA")]
        security: String,
        /// The network does not broadcast its SSID
        #[arg(long)]
        hidden: bool,
    },
    /// Interactive session: edit fields line by line and watch the payload update
    Edit {
        /// Kind to start with
        #[arg(long, default_value = "url")]
        kind: DataKind,
    },
}

impl Command {
    fn into_record(self) -> Option<Record> {
        let record = match self {
            Command::Url { url } => Record::Url(UrlRecord {
                url: url.unwrap_or_default(),
            }),
            Command::Text { text } => Record::Text(TextRecord {
                text: text.unwrap_or_default(),
            }),
            Command::Email {
                email,
                subject,
                body,
            } => Record::Email(EmailRecord {
                email,
                subject,
                body,
            }),
            Command::Phone { number } => Record::Phone(PhoneRecord {
                number: number.unwrap_or_default(),
            }),
            Command::Sms { number, message } => Record::Sms(SmsRecord { number, message }),
            Command::Contact {
                first_name,
                last_name,
                organization,
                title,
                email,
                phone,
                mobile,
            } => Record::Contact(ContactRecord {
                first_name,
                last_name,
                organization,
                title,
                email,
                phone,
                mobile,
            }),
            Command::Wifi {
                ssid,
                password,
                security,
                hidden,
            } => Record::Wifi(WifiRecord {
                ssid,
                password,
                security,
                hidden,
            }),
            Command::Edit { .. } => return None,
        };
        Some(record)
    }
}

#[derive(Debug, Clone, Copy)]
struct Requested {
    download: bool,
    copy: bool,
    share: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = QrshapeConfig::load(cli.config.as_deref())?;

    if let Some(width) = cli.width {
        config.render.width = width.max(1);
    }
    if let Some(margin) = cli.margin {
        config.render.margin = margin;
    }
    if cli.verify {
        config.render.verify = true;
    }
    if let Some(ref dir) = cli.out_dir {
        config.output.dir = dir.clone();
    }
    if cli.json {
        config.output.json = true;
    }
    if cli.data_uri {
        config.output.data_uri = true;
    }

    logging::init(&config.logging)?;
    match &config.source {
        Some(path) => info!(path = %path.display(), "Using configuration file"),
        None => tracing::debug!("No qrshape.toml / qrshape.yaml found, using defaults"),
    }

    let requested = Requested {
        download: cli.download,
        copy: cli.copy,
        share: cli.share,
    };
    let actions = build_actions(&config);
    let encoder = Arc::new(QrEncoder::with_options(config.render.clone()));

    info!(render = ?config.render, "Starting qrshape");

    match cli.command {
        Command::Edit { kind } => {
            let form = QrForm::with_records(encoder, kind, FormRecords::default())?;
            run_editor(&form, &actions, &config).await
        }
        command => {
            let Some(record) = command.into_record() else {
                return Err(Error::Other("no record for command".to_string()));
            };
            let kind = record.kind();
            let mut records = FormRecords::default();
            records.replace(record);

            let form = QrForm::with_records(encoder, kind, records)?;
            run_once(&form, &actions, &config, requested).await
        }
    }
}

fn build_actions(config: &QrshapeConfig) -> Actions {
    let saver = Arc::new(DirectorySaver::new(config.output.dir.clone()));
    let clipboard = Arc::new(CommandClipboard::from_config(
        &config.platform.clipboard_command,
    ));
    let share: Arc<dyn Share> = if config.platform.share_command.is_empty() {
        Arc::new(NoShare)
    } else {
        Arc::new(CommandShare::new(
            config.platform.share_command.clone(),
            std::env::temp_dir().join("qrshape"),
        ))
    };
    Actions::new(saver, clipboard, share)
}

async fn run_once(
    form: &QrForm,
    actions: &Actions,
    config: &QrshapeConfig,
    requested: Requested,
) -> Result<()> {
    let mut notices = form.subscribe_notices();
    form.settled().await;

    let mut report: ActionReport = Vec::new();
    if requested.download {
        report.push(("download", actions.download(form).await));
    }
    if requested.copy {
        report.push(("copy", actions.copy(form).await));
    }
    if requested.share {
        report.push(("share", actions.share(form).await));
    }

    let pending = drain_notices(&mut notices);
    emit(form, &report, &pending, config)
}

fn drain_notices(rx: &mut broadcast::Receiver<Notice>) -> Vec<Notice> {
    let mut out = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(notice) => out.push(notice),
            Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            Err(_) => break,
        }
    }
    out
}

fn emit(
    form: &QrForm,
    report: &ActionReport,
    notices: &[Notice],
    config: &QrshapeConfig,
) -> Result<()> {
    let mut rendered = render_form(form, report, config.output.data_uri);

    if config.output.json {
        if let Some(obj) = rendered.json.as_object_mut() {
            obj.insert("notices".to_string(), serde_json::to_value(notices)?);
        }
        println!("{}", serde_json::to_string_pretty(&rendered.json)?);
    } else {
        rendered
            .human
            .extend(notices.iter().map(|notice| format!("  ! {notice}")));
        for line in &rendered.human {
            println!("{line}");
        }
    }
    Ok(())
}

const EDIT_HELP: &str = "\
Commands:
  kind <name>          switch to url, text, email, phone, sms, contact or wifi
  <field>=<value>      set a field of the active kind
  fields               list fields of the active kind
  toggle <name>        flip track_scans or remove_watermark (no effect on output)
  show                 wait for the current image and print the result
  download | copy | share
  help | quit";

/// What the edit loop does with one input line.
#[derive(Debug, PartialEq, Eq)]
enum EditStep {
    Skip,
    Quit,
    Show,
    Action(&'static str),
    Reply(String),
}

/// Apply one edit-session line to `form`. Edits happen here; anything that
/// has to wait on the encoder is handed back to the loop.
fn dispatch(form: &QrForm, line: &str) -> EditStep {
    let line = line.trim();
    if line.is_empty() {
        return EditStep::Skip;
    }

    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map(|(w, r)| (w, r.trim()))
        .unwrap_or((line, ""));

    match word {
        "quit" | "exit" => EditStep::Quit,
        "help" => EditStep::Reply(EDIT_HELP.to_string()),
        "show" => EditStep::Show,
        "download" => EditStep::Action("download"),
        "copy" => EditStep::Action("copy"),
        "share" => EditStep::Action("share"),
        "kind" => match rest.parse::<DataKind>() {
            Ok(kind) => {
                form.set_kind(kind);
                EditStep::Reply(format!("payload: {}", form.payload()))
            }
            Err(err) => EditStep::Reply(err.to_string()),
        },
        "fields" => EditStep::Reply(format!(
            "{}: {}",
            form.kind(),
            FormRecords::field_names(form.kind()).join(", ")
        )),
        "toggle" => {
            let mut toggles: Toggles = form.toggles();
            match rest {
                "track_scans" => toggles.track_scans = !toggles.track_scans,
                "remove_watermark" => toggles.remove_watermark = !toggles.remove_watermark,
                other => return EditStep::Reply(format!("unknown toggle '{other}'")),
            }
            form.set_toggles(toggles);
            EditStep::Reply(format!(
                "track_scans={} remove_watermark={}",
                toggles.track_scans, toggles.remove_watermark
            ))
        }
        _ => match line.split_once('=') {
            Some((field, value)) => match form.set_field(field.trim(), value) {
                Ok(()) => EditStep::Reply(format!("payload: {}", form.payload())),
                Err(err) => EditStep::Reply(err.to_string()),
            },
            None => EditStep::Reply(format!("unknown command '{word}', type 'help'")),
        },
    }
}

async fn run_editor(form: &QrForm, actions: &Actions, config: &QrshapeConfig) -> Result<()> {
    let mut notices = form.subscribe_notices();
    let json = config.output.json;
    let notice_task = tokio::spawn(async move {
        loop {
            match notices.recv().await {
                Ok(notice) => {
                    if json {
                        match serde_json::to_string(&serde_json::json!({ "notice": notice })) {
                            Ok(line) => println!("{line}"),
                            Err(err) => tracing::warn!("Failed to serialize notice: {err}"),
                        }
                    } else {
                        println!("! {notice}");
                    }
                }
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    if !actions.can_share() {
        tracing::debug!("no share command configured; share is disabled");
    }
    println!("Editing {} QR code. Type 'help' for commands.", form.kind().label());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match dispatch(form, &line) {
            EditStep::Skip => {}
            EditStep::Quit => break,
            EditStep::Reply(text) => println!("{text}"),
            EditStep::Show => {
                form.settled().await;
                emit(form, &Vec::new(), &[], config)?;
            }
            EditStep::Action(name) => {
                form.settled().await;
                let outcome = match name {
                    "download" => actions.download(form).await,
                    "copy" => actions.copy(form).await,
                    _ => actions.share(form).await,
                };
                print_outcome(name, &outcome, json)?;
            }
        }
    }

    notice_task.abort();
    Ok(())
}

fn print_outcome(name: &str, outcome: &ActionOutcome, json: bool) -> Result<()> {
    if json {
        let mut obj = serde_json::Map::new();
        obj.insert(name.to_string(), serde_json::to_value(outcome)?);
        println!("{}", serde_json::Value::Object(obj));
    } else {
        println!("{name}: {}", outcome_label(outcome));
    }
    Ok(())
}
