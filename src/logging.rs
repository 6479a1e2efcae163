use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::Error;

/// Installs a stderr subscriber filtered by `log_level`, falling back to `info` when the
/// directive doesn't parse. stdout belongs to the action grid.
pub fn init_tracing(log_level: &str) -> Result<(), Error> {
  let filter = EnvFilter::try_new(log_level)
    .or_else(|_| EnvFilter::try_new("info"))
    .map_err(|e| Error::Logging(e.to_string()))?;

  tracing_subscriber::registry()
    .with(fmt::layer().with_writer(std::io::stderr))
    .with(filter)
    .try_init()
    .map_err(|e| Error::Logging(e.to_string()))
}
