//! Trial CLI commands.

use anyhow::Result;
use chrono::{DateTime, Utc};
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;
use dialoguer::Confirm;

use botrent_core::trial::Clock;
use botrent_types::trial::{format_remaining, BotId, TrialActivation, TrialStatus};

use crate::state::AppState;

/// Start or restart a trial and print the new record.
pub async fn activate_trial(state: &AppState, bot_id: i64, name: String, json: bool) -> Result<()> {
    let record = state.tracker.activate(BotId(bot_id), name).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Trial started for '{}' (bot {})",
        style("✓").green().bold(),
        style(&record.bot_name).cyan(),
        record.bot_id
    );
    println!(
        "  {} {}",
        style("Expires:").bold(),
        record.expires_at.format("%Y-%m-%d %H:%M UTC")
    );
    println!();

    Ok(())
}

/// Remove a trial record, asking first unless `force` or `json` is set.
pub async fn deactivate_trial(state: &AppState, bot_id: i64, force: bool, json: bool) -> Result<()> {
    let bot_id = BotId(bot_id);

    if !force && !json {
        let Some(record) = state.tracker.get_status(bot_id).await else {
            println!(
                "  {} No trial recorded for bot {}.",
                style("i").blue().bold(),
                bot_id
            );
            return Ok(());
        };

        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Remove the trial for '{}'?",
                style(&record.bot_name).red().bold()
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    let removed = state.tracker.deactivate(bot_id).await;

    if json {
        println!(
            "{}",
            serde_json::json!({"botId": bot_id, "removed": removed})
        );
    } else if removed {
        println!("  {} Trial for bot {} removed.", style("✓").red().bold(), bot_id);
    } else {
        println!("  No trial recorded for bot {bot_id}.");
    }

    Ok(())
}

/// Show one bot's trial.
pub async fn show_trial(state: &AppState, bot_id: i64, json: bool) -> Result<()> {
    let record = state.tracker.get_status(BotId(bot_id)).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    let Some(record) = record else {
        println!();
        println!(
            "  {} No trial for bot {}. Start one with: {}",
            style("i").blue().bold(),
            bot_id,
            style(format!("botrent trial activate {bot_id} <NAME>")).yellow()
        );
        println!();
        return Ok(());
    };

    let now = state.tracker.clock().now();

    println!();
    println!(
        "  {} {}",
        style(&record.bot_name).cyan().bold(),
        style(format!("(bot {})", record.bot_id)).dim()
    );
    println!();
    println!("  {} {}", style("Status:").bold(), status_label(record.status));
    println!(
        "  {} {}",
        style("Activated:").bold(),
        record.activated_at.format("%Y-%m-%d %H:%M UTC")
    );
    println!(
        "  {} {}",
        style("Expires:").bold(),
        record.expires_at.format("%Y-%m-%d %H:%M UTC")
    );
    println!("  {} {}", style("Remaining:").bold(), remaining_label(&record, now));
    println!();

    Ok(())
}

/// List every trial with its badge and countdown.
pub async fn list_trials(state: &AppState, json: bool) -> Result<()> {
    let trials = state.tracker.list().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&trials)?);
        return Ok(());
    }

    if trials.is_empty() {
        println!();
        println!(
            "  {} No trials yet. Start one with: {}",
            style("i").blue().bold(),
            style("botrent trial activate <BOT_ID> <NAME>").yellow()
        );
        println!();
        return Ok(());
    }

    let now = state.tracker.clock().now();

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Bot").fg(Color::White),
        Cell::new("Name").fg(Color::White),
        Cell::new("Status").fg(Color::White),
        Cell::new("Expires").fg(Color::White),
        Cell::new("Remaining").fg(Color::White),
    ]);

    for trial in &trials {
        let status_cell = match trial.status {
            TrialStatus::Active => Cell::new(format!("● {}", trial.status.badge())).fg(Color::Green),
            TrialStatus::Expired => Cell::new(format!("○ {}", trial.status.badge())).fg(Color::DarkGrey),
        };

        table.add_row(vec![
            Cell::new(trial.bot_id).fg(Color::White),
            Cell::new(&trial.bot_name).fg(Color::Cyan),
            status_cell,
            Cell::new(trial.expires_at.format("%Y-%m-%d %H:%M")).fg(Color::DarkGrey),
            Cell::new(remaining_label(trial, now)),
        ]);
    }

    let (total, active) = state.tracker.counts().await;

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} trial{}, {} active",
        style(total).bold(),
        if total == 1 { "" } else { "s" },
        style(active).green()
    );
    println!();

    Ok(())
}

/// Run a sweep now.
pub async fn sweep_trials(state: &AppState, json: bool) -> Result<()> {
    let transitions = state.tracker.sweep().await;

    if json {
        println!("{}", serde_json::json!({"transitions": transitions}));
    } else if transitions == 0 {
        println!("  Nothing expired.");
    } else {
        println!(
            "  {} {} trial{} expired.",
            style("✓").green().bold(),
            transitions,
            if transitions == 1 { "" } else { "s" }
        );
    }

    Ok(())
}

fn status_label(status: TrialStatus) -> String {
    match status {
        TrialStatus::Active => format!("{}", style(status.badge()).green()),
        TrialStatus::Expired => format!("{}", style(status.badge()).dim()),
    }
}

/// Countdown for a record; expired records (cached or by the clock) show `-`.
fn remaining_label(record: &TrialActivation, now: DateTime<Utc>) -> String {
    if !record.is_active() {
        return "-".to_string();
    }
    match record.remaining(now) {
        Some(left) => format_remaining(left),
        None => "-".to_string(),
    }
}
