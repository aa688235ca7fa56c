//! Tracker status dashboard command.

use anyhow::Result;
use console::style;

use crate::state::AppState;

/// Display the tracker status dashboard.
///
/// Shows trial counts by status, storage backend, last write, sweep
/// interval, and version.
pub async fn status(state: &AppState, json: bool) -> Result<()> {
    let (total, active) = state.tracker.counts().await;
    let expired = total - active;

    let store = state.tracker.store();
    let backend = store.backend();
    let last_saved = store.last_saved().await.unwrap_or_else(|err| {
        tracing::warn!(error = %err, "Failed to read last save time");
        None
    });

    if json {
        let status = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "data_dir": state.data_dir.display().to_string(),
            "storage": backend.to_string(),
            "storage_key": state.config.storage_key,
            "last_saved": last_saved.map(|dt| dt.to_rfc3339()),
            "sweep_interval_secs": state.config.sweep_interval().as_secs(),
            "trials": {
                "total": total,
                "active": active,
                "expired": expired,
            },
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} botrent v{}",
        style("⚡").bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!();

    println!("  {}", style("── Trials ──").dim());
    println!("  Total:   {}", style(total).bold());
    println!("  Active:  {}", style(active).green());
    if expired > 0 {
        println!("  Expired: {}", style(expired).dim());
    }
    println!();

    println!("  {}", style("── System ──").dim());
    println!("  Data dir: {}", style(state.data_dir.display()).dim());
    println!(
        "  Storage:  {} (key '{}')",
        style(backend).dim(),
        state.config.storage_key
    );
    match last_saved {
        Some(dt) => println!("  Saved:    {}", dt.format("%Y-%m-%d %H:%M UTC")),
        None => println!("  Saved:    {}", style("never").dim()),
    }
    println!(
        "  Sweep:    every {}",
        format_interval(state.config.sweep_interval().as_secs())
    );
    println!();

    Ok(())
}

fn format_interval(secs: u64) -> String {
    if secs >= 3600 && secs % 3600 == 0 {
        format!("{}h", secs / 3600)
    } else if secs >= 60 && secs % 60 == 0 {
        format!("{}m", secs / 60)
    } else {
        format!("{secs}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_interval() {
        assert_eq!(format_interval(60), "1m");
        assert_eq!(format_interval(90), "90s");
        assert_eq!(format_interval(7200), "2h");
        assert_eq!(format_interval(1), "1s");
    }
}
