use crate::session::{Options, Session};
use anyhow::Result;
use chrono::SecondsFormat;
use consent_core::Phase;

pub fn run(opts: &Options, json: bool) -> Result<()> {
    let mut session = Session::open(opts)?;
    session.wait_for_banner();
    let snapshot = session.handle.snapshot();

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    println!("phase: {}", snapshot.phase);
    match snapshot.phase {
        Phase::BannerShown => println!("No consent recorded; the banner is shown."),
        Phase::Resolved => {
            if let Some(decision) = &snapshot.decision {
                println!(
                    "analytics: {}",
                    if decision.analytics { "allowed" } else { "blocked" }
                );
                println!(
                    "decided: {}",
                    decision.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
                );
            }
        }
        Phase::Unset | Phase::ModalShown => {}
    }
    Ok(())
}
