use std::{collections::HashMap, path::Path, sync::Arc};

use anyhow::{Context, Result};
use platform_backend::{BackendSettings, HttpRecordsClient, InMemoryRecords, Record, SharedClient};
use tracing::{info, warn};

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// `None` when no `APPER_*` variables are set.
    pub backend: Option<BackendSettings>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let backend = BackendSettings::from_env().context("invalid backend configuration")?;
        Ok(Self { backend })
    }
}

/// Picks the hosted backend when configured, the in-memory stub otherwise.
pub fn build_client(
    config: &AppConfig,
    force_stub: bool,
    seed: Option<&Path>,
) -> Result<SharedClient> {
    match (&config.backend, force_stub) {
        (Some(settings), false) => {
            info!(
                project = %settings.project_id,
                url = %settings.base_url,
                "using hosted record backend"
            );
            let client = HttpRecordsClient::new(settings.clone())
                .context("failed to build backend HTTP client")?;
            Ok(Arc::new(client))
        }
        (None, false) => {
            warn!("APPER_PROJECT_ID not set; running in dev stub mode");
            stub_client(seed)
        }
        (_, true) => stub_client(seed),
    }
}

fn stub_client(seed: Option<&Path>) -> Result<SharedClient> {
    let backend = InMemoryRecords::new();
    if let Some(path) = seed {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read seed file {}", path.display()))?;
        let tables: HashMap<String, Vec<Record>> = serde_json::from_str(&raw)
            .with_context(|| format!("invalid seed file {}", path.display()))?;
        for (table, rows) in tables {
            let count = rows.len();
            backend.seed(&table, rows);
            info!(table = %table, count, "seeded stub table");
        }
    }
    Ok(Arc::new(backend))
}
