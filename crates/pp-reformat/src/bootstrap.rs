use anyhow::{ensure, Context};
use pp_core::core::DatasetKind;
use pp_export::OutputLayout;

use crate::config::AppConfig;
use crate::hub::HubSettings;
use crate::logging::LogFormat;

// ---------------------------------------------------------------------------
// SeedSource — whether the shuffle seed was pinned or drawn at startup
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeedSource {
    Configured,
    Random,
}

// ---------------------------------------------------------------------------
// RunPlan — fully validated run configuration
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct RunPlan {
    pub dataset: DatasetKind,
    pub layout: OutputLayout,
    pub seed: u64,
    pub seed_source: SeedSource,
    pub test_size: usize,
    pub keep_json: bool,
    pub hub: HubSettings,
    pub log_level: String,
    pub log_format: LogFormat,
}

// ---------------------------------------------------------------------------
// into_plan — converts raw AppConfig into a validated RunPlan
// ---------------------------------------------------------------------------

pub fn into_plan(config: AppConfig) -> Result<RunPlan, anyhow::Error> {
    let dataset: DatasetKind = config.data.parse()?;

    ensure!(config.split.test_size > 0, "split.test_size must be positive");
    ensure!(
        !config.output_dir.as_os_str().is_empty(),
        "output_dir must not be empty"
    );
    ensure!(
        !config.hub.revision.trim().is_empty(),
        "hub.revision must not be empty"
    );
    ensure!(
        !config.hub.config_name.trim().is_empty(),
        "hub.config_name must not be empty"
    );

    let log_format: LogFormat = config
        .logging
        .format
        .parse()
        .context("invalid logging.format")?;

    let (seed, seed_source) = match config.split.seed {
        Some(seed) => (seed, SeedSource::Configured),
        None => (rand::random::<u64>(), SeedSource::Random),
    };

    Ok(RunPlan {
        dataset,
        layout: OutputLayout::new(config.output_dir),
        seed,
        seed_source,
        test_size: config.split.test_size,
        keep_json: config.keep_json,
        hub: HubSettings {
            revision: config.hub.revision,
            config_name: config.hub.config_name,
            cache_dir: config.hub.cache_dir,
            token: config.hub.token,
            progress: config.hub.progress,
        },
        log_level: config.logging.level,
        log_format,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
