use hashbrown::HashMap;
use std::fmt::Debug;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::num::NonZeroU64;
use triomphe::Arc;

use crate::core::Exit;
use crate::core::Pid;
use crate::core::SelfLinkError;
use crate::erts::LinkConfig;
use crate::erts::Reaction;
use crate::erts::Signal;
use crate::erts::SignalExit;
use crate::erts::SignalUnlinkAck;
use crate::link::Link;
use crate::link::LinkTable;
use crate::loom::sync::RwLock;

// -----------------------------------------------------------------------------
// Table Slot
// -----------------------------------------------------------------------------

/// Registry entry: a link table and whether its owner was registered.
struct TableSlot {
  table: Arc<LinkTable>,
  pinned: bool,
}

impl TableSlot {
  #[inline]
  fn prunable(&self) -> bool {
    !self.pinned && self.table.is_empty()
  }
}

// -----------------------------------------------------------------------------
// Link Registry
// -----------------------------------------------------------------------------

/// Per-node collection of link tables, keyed by owning process.
///
/// Routes local requests and incoming peer signals to the table of the
/// process they concern.
///
/// # Table Lifecycle
///
/// A process is known to the registry while it has a table. [`open`]
/// registers a process: its table stays until [`close`] or [`terminate`].
/// [`link`] on an unregistered process creates a transient table, which is
/// dropped as soon as it empties out if pruning is enabled.
///
/// An incoming LINK for an unknown process is answered with an EXIT
/// carrying [`Exit::NoProc`]; the process is gone or never existed.
///
/// # Locking
///
/// Routed operations run under the registry read lock, so operations on
/// different tables proceed in parallel. Creating and dropping tables takes
/// the write lock. A table is never dropped while a routed operation is
/// using it: pruning re-checks emptiness under the write lock. Lock order
/// is registry, then table.
///
/// [`open`]: Self::open
/// [`close`]: Self::close
/// [`terminate`]: Self::terminate
/// [`link`]: Self::link
pub struct LinkRegistry {
  tables: RwLock<HashMap<Pid, TableSlot>>,
  config: LinkConfig,
}

impl LinkRegistry {
  /// Creates an empty registry with the default configuration.
  #[inline]
  pub fn new() -> Self {
    Self::with_config(LinkConfig::new())
  }

  /// Creates an empty registry configured by `config`.
  pub fn with_config(config: LinkConfig) -> Self {
    Self {
      tables: RwLock::new(HashMap::with_capacity(config.registry_capacity)),
      config,
    }
  }

  /// Returns the configuration of this registry.
  #[inline]
  pub fn config(&self) -> &LinkConfig {
    &self.config
  }

  /// Returns the number of tables in the registry.
  #[inline]
  pub fn len(&self) -> usize {
    self.tables.read().len()
  }

  /// Returns `true` if the registry holds no tables.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.tables.read().is_empty()
  }

  // ---------------------------------------------------------------------------
  // Table Lifecycle
  // ---------------------------------------------------------------------------

  /// Registers `pid` and returns its table, creating an empty one if needed.
  ///
  /// The table of a registered process is never pruned; it is dropped only
  /// by [`close`] or [`terminate`].
  ///
  /// [`close`]: Self::close
  /// [`terminate`]: Self::terminate
  pub fn open(&self, pid: &Pid) -> Arc<LinkTable> {
    let mut tables = self.tables.write();
    let slot: &mut TableSlot = Self::slot(&mut tables, pid, &self.config);

    slot.pinned = true;

    Arc::clone(&slot.table)
  }

  /// Returns the table of `pid`, if one exists.
  ///
  /// The handle is a snapshot: once the registry drops the table, changes
  /// made through it are no longer reachable by routed operations.
  #[inline]
  pub fn table(&self, pid: &Pid) -> Option<Arc<LinkTable>> {
    self.tables.read().get(pid).map(|slot| Arc::clone(&slot.table))
  }

  /// Removes and returns the table of `pid`.
  pub fn close(&self, pid: &Pid) -> Option<Arc<LinkTable>> {
    let removed: Option<Arc<LinkTable>> = self.tables.write().remove(pid).map(|slot| slot.table);

    if let Some(table) = removed.as_ref() {
      tracing::debug!(%pid, links = table.len(), "link table close");
    }

    removed
  }

  /// Drops the table of `pid` if it holds no links and `pid` was not
  /// registered with [`open`].
  ///
  /// Returns `true` if a table was dropped.
  ///
  /// [`open`]: Self::open
  pub fn prune(&self, pid: &Pid) -> bool {
    let mut tables = self.tables.write();

    if !tables.get(pid).is_some_and(TableSlot::prunable) {
      return false;
    }

    tables.remove(pid);

    tracing::debug!(%pid, "link table prune");

    true
  }

  // ---------------------------------------------------------------------------
  // Routed Operations
  // ---------------------------------------------------------------------------

  /// Links `local` to `remote`, returning the signal to deliver to `remote`.
  ///
  /// Creates a transient table if `local` has none. See [`LinkTable::link`].
  ///
  /// # Errors
  ///
  /// Returns [`SelfLinkError`] if `local == remote`.
  pub fn link(&self, local: &Pid, remote: &Pid) -> Result<Option<Signal>, SelfLinkError> {
    if local == remote {
      return Err(SelfLinkError);
    }

    self.with_table_or_create(local, |table| table.link(remote))
  }

  /// Starts unlinking `local` from `remote`, returning the signal to
  /// deliver to `remote`.
  ///
  /// See [`LinkTable::unlink`].
  pub fn unlink(&self, local: &Pid, remote: &Pid) -> Option<Signal> {
    self.with_table(local, |table| table.unlink(remote)).flatten()
  }

  /// Completes the pending unlink of `local` from `remote` if its
  /// correlation id is still `ulid`.
  ///
  /// A table emptied by the expiry is pruned when
  /// [`LinkConfig::prune_empty_tables`] is set. See
  /// [`LinkTable::expire_unlink`].
  pub fn expire_unlink(&self, local: &Pid, remote: &Pid, ulid: NonZeroU64) -> Option<Link> {
    let expired: Option<Link> = self
      .with_table(local, |table| table.expire_unlink(remote, ulid))
      .flatten();

    if expired.is_some() && self.config.prune_empty_tables {
      self.prune(local);
    }

    expired
  }

  /// Routes a signal received from a peer to the table of its target.
  ///
  /// For an unknown target:
  ///
  /// - **Link**: answered with an EXIT carrying [`Exit::NoProc`]
  /// - **Unlink**: acknowledged, there is nothing to remove
  /// - anything else: ignored
  ///
  /// A table emptied by the signal is pruned when
  /// [`LinkConfig::prune_empty_tables`] is set.
  pub fn on_peer_signal(&self, signal: Signal) -> Reaction {
    let target: Pid = signal.to().clone();
    let sender: Pid = signal.from().clone();

    let unknown: Reaction = match &signal {
      Signal::Link(_) => {
        Reaction::reply(SignalExit::new(target.clone(), sender, Exit::NoProc).into())
      }
      Signal::Unlink(unlink) => {
        Reaction::reply(SignalUnlinkAck::new(target.clone(), sender, unlink.ulid()).into())
      }
      Signal::UnlinkAck(_) | Signal::Exit(_) => Reaction::none(),
    };

    let Some(reaction) = self.with_table(&target, |table| table.on_peer_signal(signal)) else {
      let result: &str = if unknown.is_none() { "ignored" } else { "handled" };

      tracing::trace!(to = %target, result, reason = "no table");

      return unknown;
    };

    if self.config.prune_empty_tables {
      self.prune(&target);
    }

    reaction
  }

  /// Drops the table of terminating `pid`, returning one EXIT signal per
  /// actively linked peer.
  pub fn terminate(&self, pid: &Pid, reason: &Exit) -> Vec<Signal> {
    match self.close(pid) {
      Some(table) => table.exit(reason),
      None => Vec::new(),
    }
  }

  // ---------------------------------------------------------------------------
  // Internals
  // ---------------------------------------------------------------------------

  fn with_table<F, R>(&self, pid: &Pid, f: F) -> Option<R>
  where
    F: FnOnce(&LinkTable) -> R,
  {
    let tables = self.tables.read();
    tables.get(pid).map(|slot| f(&*slot.table))
  }

  fn with_table_or_create<F, R>(&self, pid: &Pid, f: F) -> R
  where
    F: FnOnce(&LinkTable) -> R,
  {
    {
      let tables = self.tables.read();

      if let Some(slot) = tables.get(pid) {
        return f(&*slot.table);
      }
    }

    let mut tables = self.tables.write();

    f(&*Self::slot(&mut tables, pid, &self.config).table)
  }

  fn slot<'a>(
    tables: &'a mut HashMap<Pid, TableSlot>,
    pid: &Pid,
    config: &LinkConfig,
  ) -> &'a mut TableSlot {
    tables.entry(pid.clone()).or_insert_with(|| {
      tracing::debug!(%pid, "link table open");

      TableSlot {
        table: Arc::new(LinkTable::with_capacity(pid.clone(), config.table_capacity)),
        pinned: false,
      }
    })
  }
}

impl Debug for LinkRegistry {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    f.debug_struct("LinkRegistry")
      .field("tables", &self.len())
      .field("config", &self.config)
      .finish()
  }
}

impl Default for LinkRegistry {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
