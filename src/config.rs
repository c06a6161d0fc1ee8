//! Configuration and token storage.
//!
//! Two files under the platform config directory:
//!   ~/.config/taskmaker/config.toml  — OAuth client credentials + zone label
//!   ~/.config/taskmaker/tokens.json  — tokens for the authorized account
//!
//! Tokens are read at the start of each command and rewritten after a
//! refresh or an initial authorization.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Zone label attached to timestamps when the config does not set one.
pub const DEFAULT_TIME_ZONE: &str = "America/New_York";

/// Refresh this many seconds before the access token actually expires.
const EXPIRY_SKEW_SECS: i64 = 60;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub google: Credentials,

    /// IANA zone label attached to every timestamp sent to the API
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
}

/// OAuth credentials for Google Calendar
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

fn default_time_zone() -> String {
    DEFAULT_TIME_ZONE.to_string()
}

/// Tokens for the authorized account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountTokens {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl AccountTokens {
    /// Whether the access token is expired or close enough to expiry to
    /// refresh. Tokens without a recorded expiry refresh every run.
    pub fn needs_refresh(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => Utc::now() + Duration::seconds(EXPIRY_SKEW_SECS) >= expires_at,
            None => true,
        }
    }
}

/// Get the config directory path (~/.config/taskmaker)
pub fn config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .context("Could not determine config directory")?
        .join("taskmaker");
    Ok(config_dir)
}

/// Get the config file path (~/.config/taskmaker/config.toml)
pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Get the tokens file path (~/.config/taskmaker/tokens.json)
pub fn tokens_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("tokens.json"))
}

/// Load config from ~/.config/taskmaker/config.toml
pub fn load_config() -> Result<Config> {
    let path = config_path()?;

    if !path.exists() {
        anyhow::bail!(
            "Config file not found at {}\n\n\
            Create it with your Google OAuth credentials:\n\n\
            [google]\n\
            client_id = \"your-client-id.apps.googleusercontent.com\"\n\
            client_secret = \"your-client-secret\"\n\n\
            See https://console.cloud.google.com/apis/credentials for setup.",
            path.display()
        );
    }

    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file at {}", path.display()))?;

    let config: Config = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

    validate_time_zone(&config.time_zone)?;

    Ok(config)
}

/// Reject zone labels the IANA database does not know.
fn validate_time_zone(label: &str) -> Result<()> {
    label
        .parse::<chrono_tz::Tz>()
        .map(|_| ())
        .map_err(|_| anyhow::anyhow!("Unknown time zone in config: {:?}", label))
}

/// Load tokens from ~/.config/taskmaker/tokens.json
pub fn load_tokens() -> Result<AccountTokens> {
    let path = tokens_path()?;

    if !path.exists() {
        anyhow::bail!("No stored tokens. Run `taskmaker auth` first.");
    }

    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read tokens file at {}", path.display()))?;

    let tokens: AccountTokens = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse tokens file at {}", path.display()))?;

    Ok(tokens)
}

/// Save tokens to ~/.config/taskmaker/tokens.json
pub fn save_tokens(tokens: &AccountTokens) -> Result<()> {
    let path = tokens_path()?;

    // Ensure config directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory at {}", parent.display()))?;
    }

    let contents = serde_json::to_string_pretty(tokens).context("Failed to serialize tokens")?;

    std::fs::write(&path, contents)
        .with_context(|| format!("Failed to write tokens to {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(expires_at: Option<DateTime<Utc>>) -> AccountTokens {
        AccountTokens {
            access_token: "at".to_string(),
            refresh_token: "rt".to_string(),
            expires_at,
        }
    }

    #[test]
    fn fresh_token_does_not_need_refresh() {
        let t = tokens(Some(Utc::now() + Duration::hours(1)));
        assert!(!t.needs_refresh());
    }

    #[test]
    fn expired_token_needs_refresh() {
        let t = tokens(Some(Utc::now() - Duration::hours(1)));
        assert!(t.needs_refresh());
    }

    #[test]
    fn token_near_expiry_needs_refresh() {
        // Inside the skew margin
        let t = tokens(Some(Utc::now() + Duration::seconds(10)));
        assert!(t.needs_refresh());
    }

    #[test]
    fn token_without_expiry_needs_refresh() {
        assert!(tokens(None).needs_refresh());
    }

    #[test]
    fn known_zone_labels_pass_validation() {
        assert!(validate_time_zone("America/New_York").is_ok());
        assert!(validate_time_zone("Europe/Helsinki").is_ok());
    }

    #[test]
    fn unknown_zone_label_fails_validation() {
        assert!(validate_time_zone("Mars/Olympus_Mons").is_err());
    }

    #[test]
    fn config_defaults_time_zone() {
        let config: Config = toml::from_str(
            "[google]\n\
             client_id = \"id\"\n\
             client_secret = \"secret\"\n",
        )
        .unwrap();
        assert_eq!(config.time_zone, DEFAULT_TIME_ZONE);
    }
}
