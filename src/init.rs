//! Process-wide initialization.

use crate::core::InitError;
use crate::erts::LinkConfig;

/// Installs the global tracing subscriber described by `config`.
///
/// Compact, ANSI-colored output filtered by [`LinkConfig::tracing_filter`].
/// Without the `tracing` feature this does nothing.
///
/// # Errors
///
/// Returns [`InitError`] if a global subscriber is already installed.
#[cfg(feature = "tracing")]
pub fn init_tracing(config: &LinkConfig) -> Result<(), InitError> {
  use tracing_subscriber::FmtSubscriber;
  use tracing_subscriber::fmt::format;
  use tracing_subscriber::util::SubscriberInitExt;

  FmtSubscriber::builder()
    .event_format(format().compact())
    .log_internal_errors(true)
    .with_ansi(true)
    .with_file(config.tracing_source_file)
    .with_level(true)
    .with_line_number(config.tracing_source_line)
    .with_max_level(config.tracing_filter())
    .with_target(config.tracing_source_name)
    .with_thread_ids(config.tracing_thread_info)
    .with_thread_names(config.tracing_thread_info)
    .finish()
    .try_init()
    .map_err(InitError::new)
}

/// Installs the global tracing subscriber described by `config`.
///
/// Without the `tracing` feature this does nothing.
#[cfg(not(feature = "tracing"))]
pub fn init_tracing(_config: &LinkConfig) -> Result<(), InitError> {
  Ok(())
}
