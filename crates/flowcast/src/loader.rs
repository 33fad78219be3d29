//! Reading scenario and history files
//!
//! The format is chosen by extension: `.yaml`/`.yml` are YAML, everything
//! else is JSON.

use std::fs;
use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use flowcast_core::ScenarioConfig;
use flowcast_core::model::CashFlowInstance;
use serde::de::DeserializeOwned;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Yaml,
    Json,
}

impl FileFormat {
    fn of(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                FileFormat::Yaml
            }
            _ => FileFormat::Json,
        }
    }
}

fn parse<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        fs::read_to_string(path).wrap_err_with(|| format!("failed to read {}", path.display()))?;
    let parsed = match FileFormat::of(path) {
        FileFormat::Yaml => serde_saphyr::from_str(&content)
            .wrap_err_with(|| format!("failed to parse YAML in {}", path.display()))?,
        FileFormat::Json => serde_json::from_str(&content)
            .wrap_err_with(|| format!("failed to parse JSON in {}", path.display()))?,
    };
    Ok(parsed)
}

/// Load an authored scenario. Ids are not checked until the scenario is linked.
pub fn load_scenario(path: &Path) -> Result<ScenarioConfig> {
    let mut config: ScenarioConfig = parse(path)?;
    if config.name.is_empty() {
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            config.name = stem.to_string();
        }
    }
    tracing::debug!(
        path = %path.display(),
        sources = config.sources.len(),
        frequencies = config.frequencies.len(),
        "scenario loaded"
    );
    Ok(config)
}

/// Load recorded cash flows to seed the calendar with.
pub fn load_history(path: &Path) -> Result<Vec<CashFlowInstance>> {
    let history: Vec<CashFlowInstance> = parse(path)?;
    tracing::debug!(path = %path.display(), instances = history.len(), "history loaded");
    Ok(history)
}
