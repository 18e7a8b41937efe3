use hashbrown::DefaultHashBuilder;
use hashbrown::HashTable;
use hashbrown::hash_table::Entry;
use std::fmt::Debug;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::hash::BuildHasher;
use std::num::NonZeroU64;

use crate::bifs;
use crate::consts;
use crate::core::Exit;
use crate::core::Pid;
use crate::core::SelfLinkError;
use crate::erts::Reaction;
use crate::erts::Signal;
use crate::link::Link;
use crate::link::UlidCounter;
use crate::loom::sync::RwLock;

// -----------------------------------------------------------------------------
// Link Set
// -----------------------------------------------------------------------------

/// Unsynchronized set of links, deduplicated under symmetric equality.
///
/// Entries are indexed by [`Link::hash_code`] and probed with
/// [`Link::equals_pair`], so `(A, B)` and `(B, A)` always land on the same
/// entry.
pub struct LinkSet {
  links: HashTable<Link>,
  state: DefaultHashBuilder,
}

impl LinkSet {
  /// Creates an empty set.
  #[inline]
  pub fn new() -> Self {
    Self::with_capacity(consts::CAP_LINK_TABLE)
  }

  /// Creates an empty set with space for at least `capacity` links.
  #[inline]
  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      links: HashTable::with_capacity(capacity),
      state: DefaultHashBuilder::default(),
    }
  }

  /// Returns the number of links in the set.
  #[inline]
  pub fn len(&self) -> usize {
    self.links.len()
  }

  /// Returns `true` if the set holds no links.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.links.is_empty()
  }

  /// Returns an iterator over all links in the set.
  #[inline]
  pub fn iter(&self) -> impl Iterator<Item = &Link> {
    self.links.iter()
  }

  /// Inserts a link between `local` and `remote`, returning the stored entry.
  ///
  /// If the pair is already present (in either order) the existing entry is
  /// returned unchanged.
  pub fn insert(&mut self, local: &Pid, remote: &Pid) -> Result<&mut Link, SelfLinkError> {
    if local == remote {
      return Err(SelfLinkError);
    }

    let state: &DefaultHashBuilder = &self.state;
    let hash: u64 = state.hash_one(Link::pair_hash(local, remote));

    let entry: Entry<'_, Link> = self.links.entry(
      hash,
      |link| link.equals_pair(local, remote),
      |link| state.hash_one(link),
    );

    match entry {
      Entry::Occupied(entry) => Ok(entry.into_mut()),
      Entry::Vacant(entry) => {
        let link: Link = Link::new(local.clone(), remote.clone());
        Ok(entry.insert(link).into_mut())
      }
    }
  }

  /// Returns the link between `a` and `b`, if present.
  #[inline]
  pub fn get(&self, a: &Pid, b: &Pid) -> Option<&Link> {
    self.links.find(self.hash(a, b), |link| link.equals_pair(a, b))
  }

  /// Returns the link between `a` and `b` mutably, if present.
  #[inline]
  pub fn get_mut(&mut self, a: &Pid, b: &Pid) -> Option<&mut Link> {
    let hash: u64 = self.hash(a, b);
    self.links.find_mut(hash, |link| link.equals_pair(a, b))
  }

  /// Removes and returns the link between `a` and `b`, if present.
  ///
  /// The returned link is marked [`Unlinked`].
  ///
  /// [`Unlinked`]: crate::link::LinkState::Unlinked
  #[inline]
  pub fn remove(&mut self, a: &Pid, b: &Pid) -> Option<Link> {
    self.take(a, b).map(Link::retire)
  }

  /// Removes the link between `a` and `b`, keeping its handshake state.
  pub(crate) fn take(&mut self, a: &Pid, b: &Pid) -> Option<Link> {
    let hash: u64 = self.hash(a, b);

    match self.links.find_entry(hash, |link| link.equals_pair(a, b)) {
      Ok(entry) => Some(entry.remove().0),
      Err(_) => None,
    }
  }

  /// Returns every link touching `pid`.
  #[inline]
  pub fn containing<'a>(&'a self, pid: &'a Pid) -> impl Iterator<Item = &'a Link> + 'a {
    self.links.iter().filter(move |link| link.contains(pid))
  }

  /// Removes and returns every link touching `pid`.
  #[inline]
  pub fn remove_containing(&mut self, pid: &Pid) -> Vec<Link> {
    self.take_containing(pid).into_iter().map(Link::retire).collect()
  }

  /// Removes every link touching `pid`, keeping their handshake state.
  pub(crate) fn take_containing(&mut self, pid: &Pid) -> Vec<Link> {
    self.links.extract_if(|link| link.contains(pid)).collect()
  }

  #[inline]
  fn hash(&self, a: &Pid, b: &Pid) -> u64 {
    self.state.hash_one(Link::pair_hash(a, b))
  }
}

impl Debug for LinkSet {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    f.debug_set().entries(self.links.iter()).finish()
  }
}

impl Default for LinkSet {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

// -----------------------------------------------------------------------------
// Link Table
// -----------------------------------------------------------------------------

/// Authoritative, thread-safe set of links for one local process.
///
/// # Locking
///
/// Every mutation, including a whole handshake transition, runs under a
/// single write lock scoped to this table. Queries take the read lock and
/// return owned snapshots. No operation delivers signals while the lock is
/// held: outbound signals are returned to the caller instead.
///
/// Tables of different processes share nothing and never contend.
pub struct LinkTable {
  owner: Pid,
  links: RwLock<LinkSet>,
  ulids: UlidCounter,
}

impl LinkTable {
  /// Creates an empty link table owned by `owner`.
  #[inline]
  pub fn new(owner: Pid) -> Self {
    Self::with_capacity(owner, consts::CAP_LINK_TABLE)
  }

  /// Creates an empty link table owned by `owner` with space for at least
  /// `capacity` links.
  #[inline]
  pub fn with_capacity(owner: Pid, capacity: usize) -> Self {
    Self {
      owner,
      links: RwLock::new(LinkSet::with_capacity(capacity)),
      ulids: UlidCounter::new(),
    }
  }

  /// Returns the process owning this table.
  #[inline]
  pub fn owner(&self) -> &Pid {
    &self.owner
  }

  /// Returns the number of links in the table.
  #[inline]
  pub fn len(&self) -> usize {
    self.links.read().len()
  }

  /// Returns `true` if the table holds no links.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.links.read().is_empty()
  }

  /// Inserts a link between `local` and `remote`.
  ///
  /// Idempotent: if the pair is already linked (in either order), the
  /// existing link is returned unchanged.
  ///
  /// # Errors
  ///
  /// Returns [`SelfLinkError`] if `local == remote`.
  ///
  /// # Examples
  ///
  /// ```
  /// use tether::core::Pid;
  /// use tether::link::LinkTable;
  ///
  /// let a = Pid::new("a@host", 1, 0, 1).unwrap();
  /// let b = Pid::new("b@host", 2, 0, 1).unwrap();
  /// let table = LinkTable::new(a.clone());
  ///
  /// table.insert_link(&a, &b).unwrap();
  /// table.insert_link(&b, &a).unwrap();
  ///
  /// assert_eq!(table.len(), 1);
  /// ```
  pub fn insert_link(&self, local: &Pid, remote: &Pid) -> Result<Link, SelfLinkError> {
    let mut links = self.links.write();
    let link: Link = links.insert(local, remote)?.clone();

    tracing::trace!(%link, state = %link.state(), "link insert");

    Ok(link)
  }

  /// Returns a snapshot of the link between `local` and `remote`, if present.
  #[inline]
  pub fn find_link(&self, local: &Pid, remote: &Pid) -> Option<Link> {
    self.links.read().get(local, remote).cloned()
  }

  /// Removes the link between `local` and `remote`.
  ///
  /// Removing an absent link is a no-op; another path may already have
  /// cleaned it up.
  pub fn remove_link(&self, local: &Pid, remote: &Pid) -> Option<Link> {
    let removed: Option<Link> = self.links.write().remove(local, remote);

    if let Some(link) = removed.as_ref() {
      tracing::trace!(%link, "link remove");
    }

    removed
  }

  /// Returns snapshots of every link touching `pid`.
  #[inline]
  pub fn links_containing(&self, pid: &Pid) -> Vec<Link> {
    self.links.read().containing(pid).cloned().collect()
  }

  /// Removes and returns every link touching `pid`.
  #[inline]
  pub fn remove_links_containing(&self, pid: &Pid) -> Vec<Link> {
    self.links.write().remove_containing(pid)
  }

  /// Sets the unlink correlation id of the stored link between `local` and
  /// `remote`; `0` clears it.
  ///
  /// Returns `false` if no such link exists.
  pub fn set_unlink_correlation(&self, local: &Pid, remote: &Pid, ulid: u64) -> bool {
    match self.links.write().get_mut(local, remote) {
      Some(link) => {
        link.set_unlink_correlation(ulid);
        true
      }
      None => false,
    }
  }

  // ---------------------------------------------------------------------------
  // Handshake
  // ---------------------------------------------------------------------------

  /// Links the owner to `peer`.
  ///
  /// Returns the LINK signal to deliver to `peer`, or `None` if the pair is
  /// already actively linked. Linking over a pending unlink re-enables the
  /// link and abandons the unlink.
  ///
  /// # Errors
  ///
  /// Returns [`SelfLinkError`] if `peer` is the owner.
  #[inline]
  pub fn link(&self, peer: &Pid) -> Result<Option<Signal>, SelfLinkError> {
    bifs::link_insert(self, peer)
  }

  /// Starts unlinking the owner from `peer`.
  ///
  /// The link stays in the table, marked pending with a fresh correlation
  /// id, until the matching UNLINK_ACK arrives. Returns the UNLINK signal to
  /// deliver to `peer`, or `None` if no active link exists.
  #[inline]
  pub fn unlink(&self, peer: &Pid) -> Option<Signal> {
    bifs::link_remove(self, peer)
  }

  /// Completes a pending unlink locally if its correlation id is still
  /// `ulid`.
  #[inline]
  pub fn expire_unlink(&self, peer: &Pid, ulid: NonZeroU64) -> Option<Link> {
    bifs::link_expire(self, peer, ulid)
  }

  /// Removes every link of the owner, returning one EXIT signal per peer
  /// that was actively linked.
  #[inline]
  pub fn exit(&self, reason: &Exit) -> Vec<Signal> {
    bifs::link_exit(self, reason)
  }

  /// Applies a link signal received from a peer.
  ///
  /// The returned [`Reaction`] carries any signal to send back and any exit
  /// to deliver to the owner.
  #[inline]
  pub fn on_peer_signal(&self, signal: Signal) -> Reaction {
    bifs::link_signal(self, signal)
  }

  // ---------------------------------------------------------------------------
  // Internals
  // ---------------------------------------------------------------------------

  /// Runs `f` with exclusive access to the link set.
  #[inline]
  pub(crate) fn with_links<F, R>(&self, f: F) -> R
  where
    F: FnOnce(&mut LinkSet) -> R,
  {
    let mut links = self.links.write();
    f(&mut links)
  }

  /// Returns the next unlink correlation id of this table.
  #[inline]
  pub(crate) fn next_ulid(&self) -> NonZeroU64 {
    self.ulids.next()
  }
}

impl Debug for LinkTable {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    f.debug_struct("LinkTable")
      .field("owner", &self.owner)
      .field("links", &*self.links.read())
      .finish()
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
