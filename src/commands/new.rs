use anyhow::Result;
use dialoguer::{Confirm, Input, Select};
use owo_colors::OwoColorize;

use taskmaker_core::{builder, ItemDraft, ItemKind};

use crate::{config, google};

pub async fn run(
    kind: Option<ItemKind>,
    name: Option<String>,
    description: Option<String>,
    date: Option<String>,
    start: Option<String>,
    end: Option<String>,
    all_day: bool,
) -> Result<()> {
    let cfg = config::load_config()?;

    let interactive = name.is_none() || date.is_none();

    // --- Kind ---
    let kind = match kind {
        Some(k) => k,
        None if interactive => prompt_kind()?,
        None => ItemKind::default(),
    };

    // --- Name ---
    let name = match name {
        Some(n) => n,
        None => Input::<String>::new().with_prompt("  Name").interact_text()?,
    };

    // --- Description ---
    let description = match description {
        Some(d) => d,
        None if interactive => Input::new()
            .with_prompt("  Description (skip)")
            .default(String::new())
            .show_default(false)
            .interact_text()?,
        None => String::new(),
    };

    // --- All day? ---
    // The marker phrase in the description forces a full-day span on its
    // own, so don't ask when it is present
    let all_day = if all_day || builder::has_full_day_marker(&description) {
        all_day
    } else if interactive {
        Confirm::new()
            .with_prompt("  All day?")
            .default(false)
            .interact()?
    } else {
        false
    };

    let timed = !all_day && !builder::has_full_day_marker(&description);

    // --- Start date ---
    let start_date = match date {
        Some(d) => d,
        None => prompt_with_retry("  Start date (MM-DD-YYYY)", |s| {
            builder::parse_date(s).map(|_| ())
        })?,
    };

    // --- Times (hidden for all-day items; end time for events only) ---
    let start_time = if !timed {
        start
    } else {
        match start {
            Some(s) => Some(s),
            None if interactive => Some(prompt_with_retry("  Start time (HH:MM AM/PM)", |s| {
                builder::parse_time(Some(s)).map(|_| ())
            })?),
            None => None,
        }
    };

    let end_time = if !timed || kind == ItemKind::Task {
        end
    } else {
        match end {
            Some(e) => Some(e),
            None if interactive => prompt_end_time()?,
            None => None,
        }
    };

    let draft = ItemDraft {
        kind,
        name,
        description,
        start_date,
        start_time,
        end_time,
        all_day,
    };

    // Normalize before touching the network; a bad field means no remote call
    let built = taskmaker_core::build(&draft, &cfg.time_zone)?;

    let tokens = google::valid_tokens(&cfg.google).await?;
    let inserted = google::insert_item(&cfg.google, &tokens, &built).await?;

    if interactive {
        println!();
    }
    println!("{}", format!("  Created: {}", built.payload.summary).green());
    if !inserted.html_link.is_empty() {
        println!("  {}", inserted.html_link.dimmed());
    }

    Ok(())
}

fn prompt_kind() -> Result<ItemKind> {
    let items: Vec<String> = ItemKind::ALL.iter().map(|k| k.to_string()).collect();

    let selection = Select::new()
        .with_prompt("  Type")
        .items(&items)
        .default(1) // Event
        .interact()?;

    Ok(ItemKind::ALL[selection])
}

/// Prompt the user with retry on parse errors, returning the raw input.
fn prompt_with_retry<F>(prompt: &str, check: F) -> Result<String>
where
    F: Fn(&str) -> Result<(), taskmaker_core::BuildError>,
{
    loop {
        let input: String = Input::new().with_prompt(prompt).interact_text()?;
        match check(&input) {
            Ok(()) => return Ok(input),
            Err(e) => {
                eprintln!("  {}", e.to_string().red());
            }
        }
    }
}

/// End time is optional: empty input means "ends at the start".
fn prompt_end_time() -> Result<Option<String>> {
    loop {
        let input: String = Input::new()
            .with_prompt("  End time (HH:MM AM/PM, skip)")
            .default(String::new())
            .show_default(false)
            .interact_text()?;

        if input.trim().is_empty() {
            return Ok(None);
        }

        match builder::parse_time(Some(&input)) {
            Ok(_) => return Ok(Some(input)),
            Err(e) => {
                eprintln!("  {}", e.to_string().red());
            }
        }
    }
}
