//! Observability lifecycle.

use tracing::info;

use crate::config::ServerConfig;

use super::{ObservabilityError, logging, settings};

/// Marker that logging and request settings are installed.
#[derive(Debug)]
pub(crate) struct Observability {
    log_format: crate::config::LogFormat,
}

impl Observability {
    /// Install the tracing subscriber and process-wide request settings.
    pub(crate) fn init(config: &ServerConfig) -> Result<Self, ObservabilityError> {
        settings::apply_runtime_config(config);
        logging::init_subscriber(config)?;

        Ok(Self {
            log_format: config.logging.log_format,
        })
    }

    /// Emit a final log line before the process exits.
    pub(crate) fn shutdown(self) {
        info!(log_format = ?self.log_format, "observability shut down");
    }
}
