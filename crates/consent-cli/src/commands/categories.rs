use crate::session::Options;
use anyhow::Result;
use consent_core::{Category, ConsentStore};

pub fn run(opts: &Options, json: bool) -> Result<()> {
    let decision = opts.open_store()?.load();

    let rows: Vec<(Category, Option<bool>)> = Category::ALL
        .iter()
        .map(|&category| {
            let allowed = match (&decision, category.is_adjustable()) {
                (_, false) => Some(true),
                (Some(d), true) => Some(d.permits(category)),
                (None, true) => None,
            };
            (category, allowed)
        })
        .collect();

    if json {
        let out: Vec<_> = rows
            .iter()
            .map(|(category, allowed)| {
                serde_json::json!({
                    "category": category.name(),
                    "adjustable": category.is_adjustable(),
                    "allowed": allowed,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    for (category, allowed) in rows {
        let status = match (category.is_adjustable(), allowed) {
            (false, _) => "always active",
            (true, Some(true)) => "allowed",
            (true, Some(false)) => "blocked",
            (true, None) => "not decided",
        };
        println!("{:<10} {}", category, status);
    }
    Ok(())
}
