use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;
use std::sync::Arc;

/// Reason describing why a process stopped executing.
///
/// Exit reasons travel along links: when a linked process terminates, its
/// peers receive the reason and the surrounding runtime decides whether to
/// trap it or terminate in turn.
///
/// # Examples
///
/// ```
/// use tether::core::Exit;
///
/// assert!(Exit::new("normal").is_normal());
/// assert_eq!(Exit::new("shutdown").to_string(), "shutdown");
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Exit {
  /// Clean shutdown with no errors.
  Normal,
  /// Forceful, unconditional termination.
  Killed,
  /// The peer process does not exist.
  NoProc,
  /// The node hosting the peer process is unreachable.
  NoConn,
  /// Application-defined reason.
  Reason(Arc<str>),
}

impl Exit {
  /// Creates an exit reason from its textual form.
  ///
  /// Well-known reasons map onto their dedicated variants.
  pub fn new(reason: &str) -> Self {
    match reason {
      "normal" => Self::Normal,
      "killed" => Self::Killed,
      "noproc" => Self::NoProc,
      "noconnection" => Self::NoConn,
      other => Self::Reason(Arc::from(other)),
    }
  }

  /// Returns `true` if this exit reason represents normal termination.
  #[inline]
  pub fn is_normal(&self) -> bool {
    matches!(self, Self::Normal)
  }

  /// Returns `true` if this exit reason represents forced termination.
  #[inline]
  pub fn is_killed(&self) -> bool {
    matches!(self, Self::Killed)
  }

  /// Returns `true` if this exit reason represents a missing process.
  #[inline]
  pub fn is_noproc(&self) -> bool {
    matches!(self, Self::NoProc)
  }

  /// Returns `true` if this exit reason represents a disconnected node.
  #[inline]
  pub fn is_noconn(&self) -> bool {
    matches!(self, Self::NoConn)
  }

  /// Returns the textual form of this exit reason.
  #[inline]
  pub fn as_str(&self) -> &str {
    match self {
      Self::Normal => "normal",
      Self::Killed => "killed",
      Self::NoProc => "noproc",
      Self::NoConn => "noconnection",
      Self::Reason(reason) => reason,
    }
  }
}

impl Debug for Exit {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    Display::fmt(self, f)
  }
}

impl Display for Exit {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    f.write_str(self.as_str())
  }
}

impl From<&str> for Exit {
  #[inline]
  fn from(other: &str) -> Self {
    Self::new(other)
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use crate::core::Exit;

  #[test]
  fn test_well_known() {
    assert_eq!(Exit::new("normal"), Exit::Normal);
    assert_eq!(Exit::new("killed"), Exit::Killed);
    assert_eq!(Exit::new("noproc"), Exit::NoProc);
    assert_eq!(Exit::new("noconnection"), Exit::NoConn);
  }

  #[test]
  fn test_predicates() {
    assert!(Exit::Normal.is_normal());
    assert!(!Exit::Killed.is_normal());
    assert!(Exit::Killed.is_killed());
    assert!(Exit::NoProc.is_noproc());
    assert!(Exit::NoConn.is_noconn());
    assert!(!Exit::new("custom").is_normal());
  }

  #[test]
  fn test_display_roundtrip() {
    for reason in ["normal", "killed", "noproc", "noconnection", "shutdown"] {
      assert_eq!(Exit::new(reason).to_string(), reason);
    }
  }
}
