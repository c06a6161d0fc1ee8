use anyhow::Result;
use owo_colors::OwoColorize;

use crate::{config, google};

pub async fn run() -> Result<()> {
    let cfg = config::load_config()?;

    println!("Authenticating with Google Calendar...");

    let tokens = google::authenticate(&cfg.google).await?;
    config::save_tokens(&tokens)?;

    let email = google::fetch_account_email(&cfg.google, &tokens).await?;

    println!("{}", format!("Authenticated as: {}", email).green());
    println!("\nRun `taskmaker new` to create your first item.");

    Ok(())
}
