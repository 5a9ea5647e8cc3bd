use crate::session::Options;
use anyhow::{Context, Result};

pub fn run(opts: &Options) -> Result<()> {
    let mut store = opts.open_store()?;
    store.clear().context("failed to clear stored consent")?;
    println!("Cleared stored consent ({})", store.key());
    Ok(())
}
