//! `skiff status` — show the instance state and address.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::lifecycle;
use crate::output::progress;

/// Run `skiff status`.
///
/// # Errors
///
/// Returns an error if the inventory query fails or finds multiple
/// instances.
pub async fn run(app: &AppContext) -> Result<()> {
    let spinner = app
        .output
        .show_progress()
        .then(|| progress::spinner("querying inventory..."));

    let located = lifecycle::locate(&app.inventory, &app.config.name_tag).await;
    if let Some(ref pb) = spinner {
        pb.finish_and_clear();
    }

    match located? {
        Some(instance) => {
            if app.json {
                println!("{}", serde_json::to_string_pretty(&instance)?);
            } else {
                app.output.kv("ID", &instance.id);
                app.output.kv("State", &instance.state.to_string());
                app.output.kv("Address", &instance.public_address);
                app.output.kv("Region", &instance.region);
                app.output.kv("Type", &instance.instance_type);
            }
        }
        None => {
            if app.json {
                println!("null");
            } else {
                app.output.info("No instance running.");
                app.output.kv("Create", "skiff up");
            }
        }
    }
    Ok(())
}
