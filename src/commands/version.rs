//! `skiff version` — print the CLI version.

use anyhow::Result;

/// Run `skiff version`.
///
/// # Errors
///
/// Infallible in practice; returns `Result` for uniformity with the other
/// command handlers.
pub fn run(json: bool) -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");
    if json {
        println!("{}", serde_json::json!({ "version": version }));
    } else {
        println!("skiff {version}");
    }
    Ok(())
}
