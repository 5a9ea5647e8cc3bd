use crate::commands::report_commit;
use crate::session::{Options, Session};
use anyhow::{bail, Result};

pub fn run(opts: &Options, analytics: bool, json: bool) -> Result<()> {
    let session = Session::open(opts)?;
    let handle = &session.handle;

    if handle.open_settings().is_ignored() {
        bail!("cannot open cookie settings in phase '{}'", handle.phase());
    }
    handle.toggle_analytics(analytics);
    let outcome = handle.save_preferences();
    if outcome.is_ignored() {
        bail!("cannot save preferences in phase '{}'", handle.phase());
    }
    report_commit(&outcome, &handle.snapshot(), json, "Saved preferences")
}
