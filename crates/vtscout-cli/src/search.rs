//! `search` command: one discovery run printed as JSON.

use vtscout_core::{AppConfig, Platform};
use vtscout_discovery::{ClientSettings, Discovery};

use crate::print_json;

/// Runs discovery for `name` and prints the report.
///
/// Platforms without credentials appear under `failures` instead of
/// aborting the command, matching the server's behavior.
pub(crate) async fn run_search(
    config: &AppConfig,
    name: &str,
    platform: Option<Platform>,
    compact: bool,
) -> anyhow::Result<()> {
    let query = name.trim();
    if query.is_empty() {
        anyhow::bail!("search name must not be empty");
    }

    let mut discovery =
        Discovery::from_credentials(&config.credentials, &ClientSettings::from(config))?;
    if let Some(platform) = platform {
        discovery = discovery.restrict_to(platform);
    }

    let report = discovery.discover(query).await;
    for failure in &report.failures {
        tracing::warn!(platform = %failure.platform, message = %failure.message, "platform failed");
    }
    print_json(&report, compact)
}
