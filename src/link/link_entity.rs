use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;
use std::hash::Hash;
use std::hash::Hasher;
use std::num::NonZeroU64;
use std::sync::OnceLock;

use crate::consts;
use crate::core::Pid;
use crate::core::StableHash;
use crate::link::LinkState;

/// Undirected link between two processes.
///
/// The endpoints are called `local` and `remote` by storage convention only:
/// a link between A and B *is* the link between B and A. Equality and
/// hashing are therefore symmetric, see [`Link::equals_pair`] and
/// [`Link::hash_code`].
///
/// The endpoints never change after construction; only the handshake
/// [`LinkState`] does.
#[derive(Clone)]
pub struct Link {
  local: Pid,
  remote: Pid,
  state: LinkState,
  hcode: OnceLock<u32>,
}

impl Link {
  /// Creates a new active link between `local` and `remote`.
  #[inline]
  pub fn new(local: Pid, remote: Pid) -> Self {
    Self {
      local,
      remote,
      state: LinkState::Linked,
      hcode: OnceLock::new(),
    }
  }

  /// Returns the endpoint stored as local.
  #[inline]
  pub fn local(&self) -> &Pid {
    &self.local
  }

  /// Returns the endpoint stored as remote.
  #[inline]
  pub fn remote(&self) -> &Pid {
    &self.remote
  }

  /// Returns `true` if `pid` is either endpoint of this link.
  #[inline]
  pub fn contains(&self, pid: &Pid) -> bool {
    self.local == *pid || self.remote == *pid
  }

  /// Returns the endpoint opposite to `pid`, or `None` if `pid` is not an
  /// endpoint of this link.
  #[inline]
  pub fn peer_of(&self, pid: &Pid) -> Option<&Pid> {
    if self.local == *pid {
      Some(&self.remote)
    } else if self.remote == *pid {
      Some(&self.local)
    } else {
      None
    }
  }

  /// Returns `true` if `{a, b}` and `{local, remote}` are the same unordered
  /// pair.
  ///
  /// # Examples
  ///
  /// ```
  /// use tether::core::Pid;
  /// use tether::link::Link;
  ///
  /// let a = Pid::new("a@host", 1, 0, 1).unwrap();
  /// let b = Pid::new("b@host", 2, 0, 1).unwrap();
  /// let link = Link::new(a.clone(), b.clone());
  ///
  /// assert!(link.equals_pair(&a, &b));
  /// assert!(link.equals_pair(&b, &a));
  /// ```
  #[inline]
  pub fn equals_pair(&self, a: &Pid, b: &Pid) -> bool {
    (self.local == *a && self.remote == *b) || (self.local == *b && self.remote == *a)
  }

  /// Returns the order-independent hash code of this link.
  ///
  /// Computed on first use and cached; the endpoints are immutable so the
  /// cached value never goes stale.
  #[inline]
  pub fn hash_code(&self) -> u32 {
    *self
      .hcode
      .get_or_init(|| Self::pair_hash(&self.local, &self.remote))
  }

  /// Returns the hash code a link between `a` and `b` would have.
  ///
  /// The endpoint hashes are summed before scrambling, so the result does
  /// not depend on the argument order.
  #[inline]
  pub fn pair_hash(a: &Pid, b: &Pid) -> u32 {
    StableHash::new(consts::LINK_HASH_SEED)
      .combine(a.hash_code().wrapping_add(b.hash_code()))
      .value()
  }

  // ---------------------------------------------------------------------------
  // Handshake State
  // ---------------------------------------------------------------------------

  /// Returns the handshake state.
  #[inline]
  pub const fn state(&self) -> LinkState {
    self.state
  }

  /// Returns `true` if the link is enabled (not being unlinked).
  #[inline]
  pub const fn is_enabled(&self) -> bool {
    self.state.is_enabled()
  }

  /// Returns `true` if an unlink is in flight.
  #[inline]
  pub const fn is_disabled(&self) -> bool {
    self.state.is_disabled()
  }

  /// Returns `true` if an unlink with id `ulid` is in flight.
  #[inline]
  pub fn matches(&self, ulid: NonZeroU64) -> bool {
    self.state.matches(ulid)
  }

  /// Returns the in-flight unlink correlation id, `0` if none.
  #[inline]
  pub const fn unlink_correlation(&self) -> u64 {
    self.state.correlation()
  }

  /// Sets the unlink correlation id; `0` clears it.
  ///
  /// Has no effect once the link is [`LinkState::Unlinked`].
  #[inline]
  pub fn set_unlink_correlation(&mut self, ulid: u64) {
    match NonZeroU64::new(ulid) {
      Some(ulid) => self.disable(ulid),
      None => self.enable(),
    }
  }

  /// Clears any in-flight unlink.
  #[inline]
  pub fn enable(&mut self) {
    if !self.state.is_unlinked() {
      self.state = LinkState::Linked;
    }
  }

  /// Marks an unlink with id `ulid` as in flight.
  #[inline]
  pub fn disable(&mut self, ulid: NonZeroU64) {
    if !self.state.is_unlinked() {
      self.state = LinkState::UnlinkPending(ulid);
    }
  }

  /// Consumes a link removed from its table, marking it terminal.
  #[inline]
  pub(crate) fn retire(mut self) -> Self {
    self.state = LinkState::Unlinked;
    self
  }
}

impl PartialEq for Link {
  #[inline]
  fn eq(&self, other: &Self) -> bool {
    self.equals_pair(&other.local, &other.remote)
  }
}

impl Eq for Link {}

impl Hash for Link {
  #[inline]
  fn hash<H: Hasher>(&self, state: &mut H) {
    state.write_u32(self.hash_code());
  }
}

impl Debug for Link {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    f.debug_struct("Link")
      .field("local", &self.local)
      .field("remote", &self.remote)
      .field("state", &self.state)
      .finish()
  }
}

impl Display for Link {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    write!(f, "{} <-> {}", self.local, self.remote)
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use hashbrown::HashSet;
  use std::num::NonZeroU64;

  use crate::core::Pid;
  use crate::link::Link;
  use crate::link::LinkState;

  fn pid(number: u32) -> Pid {
    Pid::new("alpha@host", number, 0, 1).unwrap()
  }

  #[test]
  fn test_new_is_linked() {
    let link: Link = Link::new(pid(1), pid(2));

    assert_eq!(link.state(), LinkState::Linked);
    assert_eq!(link.unlink_correlation(), 0);
  }

  #[test]
  fn test_symmetric_equality() {
    let (a, b) = (pid(1), pid(2));

    assert!(Link::new(a.clone(), b.clone()).equals_pair(&b, &a));
    assert!(Link::new(a.clone(), b.clone()).equals_pair(&a, &b));
    assert_eq!(Link::new(a.clone(), b.clone()), Link::new(b, a));
  }

  #[test]
  fn test_symmetric_hash() {
    for (x, y) in [(1, 2), (3, 900), (7, 7), (0, u32::MAX)] {
      let ab: Link = Link::new(pid(x), pid(y));
      let ba: Link = Link::new(pid(y), pid(x));

      assert_eq!(ab.hash_code(), ba.hash_code());
      assert_eq!(ab.hash_code(), Link::pair_hash(&pid(y), &pid(x)));
    }
  }

  #[test]
  fn test_hash_cached() {
    let link: Link = Link::new(pid(1), pid(2));

    assert_eq!(link.hash_code(), link.hash_code());
    assert_eq!(link.clone().hash_code(), link.hash_code());
  }

  #[test]
  fn test_contains() {
    let link: Link = Link::new(pid(1), pid(2));

    assert!(link.contains(&pid(1)));
    assert!(link.contains(&pid(2)));
    assert!(!link.contains(&pid(3)));
  }

  #[test]
  fn test_peer_of() {
    let link: Link = Link::new(pid(1), pid(2));

    assert_eq!(link.peer_of(&pid(1)), Some(&pid(2)));
    assert_eq!(link.peer_of(&pid(2)), Some(&pid(1)));
    assert_eq!(link.peer_of(&pid(3)), None);
  }

  #[test]
  fn test_not_equal_other_pair() {
    let link: Link = Link::new(pid(1), pid(2));

    assert!(!link.equals_pair(&pid(1), &pid(3)));
    assert!(!link.equals_pair(&pid(2), &pid(2)));
  }

  #[test]
  fn test_correlation_accessors() {
    let mut link: Link = Link::new(pid(1), pid(2));

    link.set_unlink_correlation(42);
    assert_eq!(link.unlink_correlation(), 42);
    assert!(link.is_disabled());
    assert!(link.matches(NonZeroU64::new(42).unwrap()));

    link.set_unlink_correlation(0);
    assert_eq!(link.unlink_correlation(), 0);
    assert!(link.is_enabled());
  }

  #[test]
  fn test_retired_is_terminal() {
    let mut link: Link = Link::new(pid(1), pid(2)).retire();

    link.set_unlink_correlation(42);
    assert_eq!(link.state(), LinkState::Unlinked);

    link.enable();
    assert_eq!(link.state(), LinkState::Unlinked);
  }

  #[test]
  fn test_hash_set_dedup() {
    let mut set: HashSet<Link> = HashSet::new();

    set.insert(Link::new(pid(1), pid(2)));
    set.insert(Link::new(pid(2), pid(1)));
    set.insert(Link::new(pid(1), pid(3)));

    assert_eq!(set.len(), 2);
  }
}
