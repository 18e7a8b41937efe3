use crate::consts;

// -----------------------------------------------------------------------------
// Link Config
// -----------------------------------------------------------------------------

/// Configuration of a [`LinkRegistry`] and its tracing output.
///
/// [`LinkRegistry`]: crate::link::LinkRegistry
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkConfig {
  // ---------------------------------------------------------------------------
  // Registry Configuration
  // ---------------------------------------------------------------------------
  /// Number of pre-allocated links in each new link table.
  pub table_capacity: usize,
  /// Number of pre-allocated link tables in a registry.
  pub registry_capacity: usize,
  /// Drop transient link tables as soon as they hold no links.
  pub prune_empty_tables: bool,
  // ---------------------------------------------------------------------------
  // Tracing Subscriber Configuration
  // ---------------------------------------------------------------------------
  /// Include the source file of each event.
  pub tracing_source_file: bool,
  /// Include the source line of each event.
  pub tracing_source_line: bool,
  /// Include the target (module path) of each event.
  pub tracing_source_name: bool,
  /// Include thread ids and names.
  pub tracing_thread_info: bool,
  /// Emit `DEBUG` events.
  pub tracing_verbose: bool,
  /// Emit `TRACE` events; overrides `tracing_verbose`.
  pub tracing_very_verbose: bool,
}

impl LinkConfig {
  #[inline]
  pub fn new() -> Self {
    Self {
      table_capacity: consts::CAP_LINK_TABLE,
      registry_capacity: consts::CAP_LINK_REGISTRY,
      prune_empty_tables: consts::PRUNE_EMPTY_TABLES,
      tracing_source_file: false,
      tracing_source_line: false,
      tracing_source_name: false,
      tracing_thread_info: true,
      tracing_verbose: true,
      tracing_very_verbose: false,
    }
  }

  #[inline]
  pub const fn tracing_filter(&self) -> tracing::Level {
    if self.tracing_very_verbose {
      tracing::Level::TRACE
    } else if self.tracing_verbose {
      tracing::Level::DEBUG
    } else {
      tracing::Level::INFO
    }
  }
}

impl Default for LinkConfig {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
