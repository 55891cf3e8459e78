//! Log output for the filedesk binary
//!
//! `filedesk_core` emits one `info!` per request it starts and an `error!`
//! for every failure it turns into an alert. By default only warnings reach
//! stderr, so a session shows alerts and nothing else. `--debug` lowers the
//! level; `RUST_LOG` wins over both, e.g.
//! `RUST_LOG=filedesk_core=info filedesk shell`.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// `--debug` was passed
    pub debug: bool,
}

impl TracingConfig {
    fn default_directive(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "warn"
        }
    }
}

pub fn init(config: &TracingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.debug)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_flag_lowers_the_default_level() {
        assert_eq!(TracingConfig { debug: true }.default_directive(), "debug");
        assert_eq!(TracingConfig::default().default_directive(), "warn");
    }
}
