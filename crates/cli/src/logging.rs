use crate::CliError;
use std::io;
use tracing_subscriber::{fmt::Layer, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. `RUST_LOG` takes precedence over `level`.
///
/// Logs go to stderr so command output on stdout stays machine readable.
pub fn init_logging(level: &str, json: bool) -> Result<(), CliError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| CliError::Logging(e.to_string()))?;

    let registry = tracing_subscriber::registry().with(filter);

    let installed = if json {
        registry
            .with(Layer::new().with_writer(io::stderr).json())
            .try_init()
    } else {
        registry
            .with(Layer::new().with_writer(io::stderr))
            .try_init()
    };

    installed.map_err(|e| CliError::Logging(e.to_string()))
}
