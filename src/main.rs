//! Rosterforge audit reporter
//!
//! Offline, best-effort scan of the faction data directory: reports
//! every ability whose mechanics exist only by text-pattern inference
//! (candidates for structured authoring, and for reviewing the
//! heuristics' known false positives) and every ability whose text
//! matched nothing at all.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rosterforge::application::ports::outbound::FactionDataPort;
use rosterforge::application::services::AuditService;
use rosterforge::infrastructure::config::AppConfig;
use rosterforge::infrastructure::content::JsonFactionStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rosterforge=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    tracing::info!("Scanning faction data in {:?}", config.data_dir);

    let store = JsonFactionStore::new(&config.data_dir);
    let faction_ids = store.list_factions().await?;
    if faction_ids.is_empty() {
        tracing::warn!(
            "No faction data found; set ROSTERFORGE_DATA_DIR to a directory of faction JSON files"
        );
        return Ok(());
    }

    for id in faction_ids {
        let Some(faction) = store.load_faction(&id).await? else {
            continue;
        };
        let report = AuditService::audit_faction(&faction);

        println!(
            "\n{} - {} abilities scanned, {} flagged",
            report.faction,
            report.abilities_scanned,
            report.findings.len()
        );
        for finding in report.heuristic_only() {
            println!(
                "  [heuristic-only] {} / {} -> {} inferred mechanic(s)",
                finding.datasheet,
                finding.ability,
                finding.inferred.len()
            );
        }
        for finding in report.unclassified() {
            println!(
                "  [unclassified]   {} / {}",
                finding.datasheet, finding.ability
            );
        }
    }

    Ok(())
}
