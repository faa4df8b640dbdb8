//! Render one QR code per data kind into the current directory
//!
//! Usage: cargo run --example generate_qr

use qrshape::actions::{Actions, CommandClipboard, DirectorySaver, NoShare};
use qrshape::{DataKind, QrEncoder, QrForm};
use std::sync::Arc;

#[tokio::main]
async fn main() -> qrshape::Result<()> {
    tracing_subscriber::fmt::init();

    let form = QrForm::new(Arc::new(QrEncoder::new()))?;
    let actions = Actions::new(
        Arc::new(DirectorySaver::new(".")),
        Arc::new(CommandClipboard::detect()),
        Arc::new(NoShare),
    );

    form.edit(|records| {
        records.url.url = "https://www.rust-lang.org".to_string();
        records.email.email = "ferris@example.com".to_string();
        records.email.subject = "Hello from qrshape".to_string();
        records.contact.first_name = "Ferris".to_string();
        records.contact.last_name = "Crab".to_string();
        records.wifi.ssid = "HomeNet".to_string();
        records.wifi.password = "correct horse".to_string();
    });

    for kind in DataKind::ALL {
        form.set_kind(kind);
        form.settled().await;
        let outcome = actions.download(&form).await;
        println!("{kind}: {outcome:?}");
        println!("  {}", form.payload().replace('\n', "\n  "));
    }

    Ok(())
}
