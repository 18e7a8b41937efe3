use std::fmt::Debug;
use std::fmt::Formatter;
use std::fmt::Result;
use std::num::NonZeroU64;

use crate::loom::sync::atomic::AtomicU64;
use crate::loom::sync::atomic::Ordering;

/// Generator of unlink correlation ids ("ulids").
///
/// Ids are drawn from a monotonic counter that skips zero, so every id is
/// non-zero and no two outstanding handshakes of one table share an id
/// until the counter wraps after 2^64 draws.
pub struct UlidCounter {
  inner: AtomicU64,
}

impl UlidCounter {
  /// Creates a new counter whose first id is `1`.
  #[inline]
  pub fn new() -> Self {
    Self {
      inner: AtomicU64::new(1),
    }
  }

  /// Returns the next correlation id.
  pub fn next(&self) -> NonZeroU64 {
    'next: loop {
      let current: u64 = self.inner.load(Ordering::Relaxed);
      let updated: u64 = match current.wrapping_add(1) {
        0 => 1,
        value => value,
      };

      if self
        .inner
        .compare_exchange_weak(current, updated, Ordering::Relaxed, Ordering::Relaxed)
        .is_err()
      {
        continue 'next;
      }

      if let Some(ulid) = NonZeroU64::new(current) {
        break 'next ulid;
      }
    }
  }
}

impl Debug for UlidCounter {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    Debug::fmt(&self.inner, f)
  }
}

impl Default for UlidCounter {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
