pub mod accept;
pub mod categories;
pub mod configure;
pub mod reset;
pub mod status;

use anyhow::Result;
use chrono::SecondsFormat;
use consent_core::{ConsentSnapshot, Outcome};

pub(crate) fn on_off(allowed: bool) -> &'static str {
    if allowed {
        "enabled"
    } else {
        "disabled"
    }
}

/// Print the committed decision, warning when it only lives in this session.
pub(crate) fn report_commit(
    outcome: &Outcome,
    snapshot: &ConsentSnapshot,
    json: bool,
    verb: &str,
) -> Result<()> {
    let saved = matches!(outcome, Outcome::Committed { saved: true, .. });
    if !saved {
        eprintln!("warning: decision could not be stored; it will be asked again next visit");
    }
    if json {
        let out = serde_json::json!({
            "saved": saved,
            "state": snapshot,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }
    if let Some(decision) = &snapshot.decision {
        println!(
            "{} (analytics {}) at {}",
            verb,
            on_off(decision.analytics),
            decision.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
        );
    }
    Ok(())
}
