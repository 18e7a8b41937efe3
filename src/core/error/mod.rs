use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;

// -----------------------------------------------------------------------------
// @error - PidError
// -----------------------------------------------------------------------------

/// Error returned when a process identifier is built from malformed data.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
#[non_exhaustive]
pub enum PidError {
  /// The node name is empty.
  EmptyNode,
  /// The node name exceeds [`MAX_NODE_CHARS`] bytes.
  ///
  /// [`MAX_NODE_CHARS`]: crate::consts::MAX_NODE_CHARS
  NodeTooLong,
  /// The node name is not of the form `name@host`.
  BadNodeName,
}

impl Display for PidError {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    match self {
      Self::EmptyNode => f.write_str("invalid pid: empty node name"),
      Self::NodeTooLong => f.write_str("invalid pid: node name too long"),
      Self::BadNodeName => f.write_str("invalid pid: node name must be `name@host`"),
    }
  }
}

impl Error for PidError {}

// -----------------------------------------------------------------------------
// @error - SelfLinkError
// -----------------------------------------------------------------------------

/// Error returned when attempting to link a process to itself.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
#[non_exhaustive]
pub struct SelfLinkError;

impl Display for SelfLinkError {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    f.write_str("cannot link a process to itself")
  }
}

impl Error for SelfLinkError {}

// -----------------------------------------------------------------------------
// @error - InitError
// -----------------------------------------------------------------------------

/// Error returned when the global tracing subscriber cannot be installed.
#[derive(Debug)]
#[non_exhaustive]
pub struct InitError {
  source: Box<dyn Error + Send + Sync + 'static>,
}

impl InitError {
  #[allow(dead_code, reason = "constructed only with the `tracing` feature")]
  pub(crate) fn new<E>(source: E) -> Self
  where
    E: Into<Box<dyn Error + Send + Sync + 'static>>,
  {
    Self {
      source: source.into(),
    }
  }
}

impl Display for InitError {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    write!(f, "failed to set tracing subscriber: {}", self.source)
  }
}

impl Error for InitError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    Some(&*self.source)
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use crate::core::InitError;
  use crate::core::PidError;
  use crate::core::SelfLinkError;

  #[test]
  fn test_display() {
    assert_eq!(PidError::EmptyNode.to_string(), "invalid pid: empty node name");
    assert_eq!(SelfLinkError.to_string(), "cannot link a process to itself");
  }

  #[test]
  fn test_init_error_source() {
    use std::error::Error;

    let error: InitError = InitError::new("already set");

    assert_eq!(error.to_string(), "failed to set tracing subscriber: already set");
    assert!(error.source().is_some());
  }
}
