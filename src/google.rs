//! Google Calendar API glue.
//!
//! Client construction, the OAuth consent flow with its local callback
//! listener, token refresh, and the one remote operation this tool
//! performs: inserting an item into the primary calendar.

use anyhow::{Context, Result};
use google_calendar::types::{EventDateTime, MinAccessRole, SendUpdates};
use google_calendar::Client;
use log::debug;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;

use crate::config::{self, AccountTokens, Credentials};
use taskmaker_core::{BuiltItem, ZonedTimestamp};

const REDIRECT_PORT: u16 = 8085;
const REDIRECT_URI: &str = "http://localhost:8085/callback";

const SCOPES: &[&str] = &["https://www.googleapis.com/auth/calendar"];

/// Google's alias for the user's main calendar
const PRIMARY_CALENDAR_ID: &str = "primary";

/// Create a Google Calendar client from stored tokens
pub fn create_client(creds: &Credentials, tokens: &AccountTokens) -> Client {
    Client::new(
        creds.client_id.clone(),
        creds.client_secret.clone(),
        REDIRECT_URI.to_string(),
        tokens.access_token.clone(),
        tokens.refresh_token.clone(),
    )
}

/// Create a new client for initial authentication (no tokens yet)
fn create_auth_client(creds: &Credentials) -> Client {
    Client::new(
        creds.client_id.clone(),
        creds.client_secret.clone(),
        REDIRECT_URI.to_string(),
        String::new(),
        String::new(),
    )
}

/// Start a local HTTP server to receive the OAuth callback
/// Returns (code, state)
fn wait_for_callback() -> Result<(String, String)> {
    let listener = TcpListener::bind(format!("127.0.0.1:{}", REDIRECT_PORT))
        .with_context(|| format!("Failed to bind to port {}", REDIRECT_PORT))?;

    println!("Waiting for OAuth callback on port {}...", REDIRECT_PORT);

    let (mut stream, _) = listener.accept().context("Failed to accept connection")?;

    let mut reader = BufReader::new(&stream);
    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;

    // Request line looks like: GET /callback?code=xxx&state=yyy HTTP/1.1
    let url_part = request_line
        .split_whitespace()
        .nth(1)
        .context("Invalid request")?;

    let url = url::Url::parse(&format!("http://localhost{}", url_part))?;

    let code = url
        .query_pairs()
        .find(|(k, _)| k == "code")
        .map(|(_, v)| v.to_string())
        .context("No code in callback")?;

    let state = url
        .query_pairs()
        .find(|(k, _)| k == "state")
        .map(|(_, v)| v.to_string())
        .context("No state in callback")?;

    // Send a response to the browser
    let response = "HTTP/1.1 200 OK\r\n\
        Content-Type: text/html\r\n\
        Connection: close\r\n\
        \r\n\
        <html><body>\
        <h1>Authentication successful!</h1>\
        <p>You can close this window and return to the terminal.</p>\
        </body></html>";

    stream.write_all(response.as_bytes())?;
    stream.flush()?;

    Ok((code, state))
}

/// Run the full OAuth authentication flow
pub async fn authenticate(creds: &Credentials) -> Result<AccountTokens> {
    let mut client = create_auth_client(creds);

    let scopes: Vec<String> = SCOPES.iter().map(|s| s.to_string()).collect();
    let auth_url = client.user_consent_url(&scopes);

    println!("\nOpen this URL in your browser to authenticate:\n");
    println!("{}\n", auth_url);

    // Try to open the browser automatically
    if open::that(&auth_url).is_err() {
        println!("(Could not open browser automatically, please copy the URL above)");
    }

    let (code, state) = wait_for_callback()?;

    println!("\nReceived authorization code, exchanging for tokens...");

    let access_token = client
        .get_access_token(&code, &state)
        .await
        .context("Failed to exchange code for tokens")?;

    let expires_at = if access_token.expires_in > 0 {
        Some(chrono::Utc::now() + chrono::Duration::seconds(access_token.expires_in))
    } else {
        None
    };

    Ok(AccountTokens {
        access_token: access_token.access_token,
        refresh_token: access_token.refresh_token,
        expires_at,
    })
}

/// Refresh an expired access token
pub async fn refresh_token(creds: &Credentials, tokens: &AccountTokens) -> Result<AccountTokens> {
    let client = create_client(creds, tokens);

    let access_token = client
        .refresh_access_token()
        .await
        .context("Failed to refresh token")?;

    let expires_at = if access_token.expires_in > 0 {
        Some(chrono::Utc::now() + chrono::Duration::seconds(access_token.expires_in))
    } else {
        None
    };

    // Google typically doesn't return a new refresh_token on refresh
    let refresh_token = if access_token.refresh_token.is_empty() {
        tokens.refresh_token.clone()
    } else {
        access_token.refresh_token
    };

    Ok(AccountTokens {
        access_token: access_token.access_token,
        refresh_token,
        expires_at,
    })
}

/// Load stored tokens, refreshing and re-saving them if expired.
pub async fn valid_tokens(creds: &Credentials) -> Result<AccountTokens> {
    let tokens = config::load_tokens()?;

    if tokens.needs_refresh() {
        debug!("access token expired, refreshing");
        let tokens = refresh_token(creds, &tokens).await?;
        config::save_tokens(&tokens)?;
        return Ok(tokens);
    }

    Ok(tokens)
}

/// Fetch the user's email to verify authentication
pub async fn fetch_account_email(creds: &Credentials, tokens: &AccountTokens) -> Result<String> {
    let client = create_client(creds, tokens);

    // The primary calendar's ID is typically the user's email
    let response = client
        .calendar_list()
        .list_all(MinAccessRole::default(), false, false)
        .await
        .context("Failed to fetch calendar list")?;

    for cal in response.body {
        if cal.primary && !cal.id.is_empty() {
            return Ok(cal.id);
        }
    }

    Ok("(unknown email)".to_string())
}

/// The created entry, as far as the caller reports it.
#[derive(Debug)]
pub struct InsertedItem {
    pub id: String,
    pub html_link: String,
}

/// Convert a payload timestamp into Google's EventDateTime
fn zoned_to_google(stamp: &ZonedTimestamp, wall_clock: chrono::NaiveDateTime) -> EventDateTime {
    EventDateTime {
        date: None,
        date_time: Some(wall_clock.and_utc()),
        time_zone: stamp.time_zone.clone(),
    }
}

/// Convert a built item to a Google Calendar API Event
fn to_google_event(built: &BuiltItem) -> google_calendar::types::Event {
    google_calendar::types::Event {
        summary: built.payload.summary.clone(),
        description: built.payload.description.clone(),
        start: Some(zoned_to_google(&built.payload.start, built.start)),
        end: Some(zoned_to_google(&built.payload.end, built.end)),
        ..Default::default()
    }
}

/// Insert a built item into the primary calendar
pub async fn insert_item(
    creds: &Credentials,
    tokens: &AccountTokens,
    built: &BuiltItem,
) -> Result<InsertedItem> {
    let client = create_client(creds, tokens);

    let google_event = to_google_event(built);

    debug!(
        "inserting {:?} ({} to {}) into {}",
        built.payload.summary, built.payload.start.date_time, built.payload.end.date_time,
        PRIMARY_CALENDAR_ID
    );

    let response = client
        .events()
        .insert(
            PRIMARY_CALENDAR_ID,
            0,                 // conference_data_version
            0,                 // max_attendees
            false,             // send_notifications
            SendUpdates::None, // send_updates
            false,             // supports_attachments
            &google_event,
        )
        .await
        .with_context(|| format!("Failed to create item: {}", built.payload.summary))?;

    Ok(InsertedItem {
        id: response.body.id,
        html_link: response.body.html_link,
    })
}
