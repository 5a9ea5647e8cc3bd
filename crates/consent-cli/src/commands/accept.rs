use crate::commands::report_commit;
use crate::session::{Options, Session};
use anyhow::{bail, Result};

pub fn run(opts: &Options, json: bool) -> Result<()> {
    let session = Session::open(opts)?;
    let outcome = session.handle.accept_all();
    if outcome.is_ignored() {
        bail!("cannot accept cookies in phase '{}'", session.handle.phase());
    }
    report_commit(&outcome, &session.handle.snapshot(), json, "Accepted all cookies")
}
