use std::str::FromStr;

use anyhow::anyhow;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            other => Err(anyhow!(
                "unsupported log format {other:?}, expected \"json\" or \"pretty\""
            )),
        }
    }
}

/// Builds the filter from `RUST_LOG` when set, otherwise from `level`.
pub fn env_filter(level: &str) -> Result<EnvFilter, anyhow::Error> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => Ok(EnvFilter::try_new(level)?),
    }
}

/// Installs the global tracing subscriber. Logs go to stderr.
pub fn init(level: &str, format: LogFormat) -> Result<(), anyhow::Error> {
    let filter = env_filter(level)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let installed = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.with_target(false).try_init(),
    };
    installed.map_err(|err| anyhow!(err))
}
