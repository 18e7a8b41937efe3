use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;
use std::num::NonZeroU64;

/// Handshake state of a process link.
///
/// Unlinking is asynchronous and must be tracked to avoid races with exit
/// signals travelling the other way.
///
/// # States
///
/// - **Linked**: Link is active, exit signals propagate
/// - **UnlinkPending**: Unlink initiated with the given id, awaiting ack
/// - **Unlinked**: Link removed from its table (terminal)
///
/// # Unlink Protocol
///
/// 1. Sender calls `unlink(pid)`, draws a fresh id, moves to `UnlinkPending`
/// 2. Sender sends UNLINK with the id to the peer
/// 3. Peer removes its side and replies UNLINK_ACK with the same id
/// 4. Sender receives UNLINK_ACK and removes the link if the id matches
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub enum LinkState {
  /// Active link.
  #[default]
  Linked,
  /// Unlink in flight with the given correlation id.
  UnlinkPending(NonZeroU64),
  /// Removed from its table.
  Unlinked,
}

impl LinkState {
  /// Returns `true` if the link is enabled (not being unlinked).
  #[inline]
  pub const fn is_enabled(&self) -> bool {
    matches!(self, Self::Linked)
  }

  /// Returns `true` if an unlink is in flight.
  #[inline]
  pub const fn is_disabled(&self) -> bool {
    matches!(self, Self::UnlinkPending(_))
  }

  /// Returns `true` if the link has been removed.
  #[inline]
  pub const fn is_unlinked(&self) -> bool {
    matches!(self, Self::Unlinked)
  }

  /// Returns `true` if an unlink with id `ulid` is in flight.
  #[inline]
  pub fn matches(&self, ulid: NonZeroU64) -> bool {
    matches!(self, Self::UnlinkPending(id) if *id == ulid)
  }

  /// Returns the in-flight correlation id as an integer, `0` if none.
  #[inline]
  pub const fn correlation(&self) -> u64 {
    match self {
      Self::UnlinkPending(id) => id.get(),
      Self::Linked | Self::Unlinked => 0,
    }
  }
}

impl Display for LinkState {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    match self {
      Self::Linked => f.write_str("linked"),
      Self::UnlinkPending(id) => write!(f, "unlink pending ({id})"),
      Self::Unlinked => f.write_str("unlinked"),
    }
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use std::num::NonZeroU64;

  use crate::link::LinkState;

  const ULID: NonZeroU64 = NonZeroU64::new(42).unwrap();

  #[test]
  fn test_default_linked() {
    assert_eq!(LinkState::default(), LinkState::Linked);
    assert!(LinkState::default().is_enabled());
  }

  #[test]
  fn test_matches() {
    let state: LinkState = LinkState::UnlinkPending(ULID);

    assert!(state.is_disabled());
    assert!(state.matches(ULID));
    assert!(!state.matches(NonZeroU64::new(7).unwrap()));
    assert!(!LinkState::Linked.matches(ULID));
    assert!(!LinkState::Unlinked.matches(ULID));
  }

  #[test]
  fn test_correlation() {
    assert_eq!(LinkState::Linked.correlation(), 0);
    assert_eq!(LinkState::UnlinkPending(ULID).correlation(), 42);
    assert_eq!(LinkState::Unlinked.correlation(), 0);
  }
}
