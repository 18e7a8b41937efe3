//! Node-scoped process identifier.
//!
//! A [`Pid`] names one process on one node of a distributed system. It is the
//! unit that links are drawn between, whether the process lives on this node
//! or a remote one.
//!
//! # Format
//!
//! PIDs display in an Erlang-like format: `#PID<Node.Number.Serial>`.

use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::hash::Hash;
use std::hash::Hasher;
use std::sync::Arc;

use crate::consts;
use crate::core::PidError;
use crate::core::StableHash;

/// Identifier uniquely naming a process within a cluster of nodes.
///
/// # Fields
///
/// - **Node**: Name of the node hosting the process (`name@host`)
/// - **Number**: Process slot on that node
/// - **Serial**: Reuse counter for the slot
/// - **Creation**: Incarnation of the node
///
/// `Pid`s are immutable; the stable hash code is computed once at
/// construction.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Pid {
  node: Arc<str>,
  number: u32,
  serial: u32,
  creation: u32,
  hcode: u32,
}

impl Pid {
  /// Creates a new `Pid`.
  ///
  /// # Errors
  ///
  /// Returns [`PidError`] if `node` is not a well-formed `name@host` node
  /// name of at most [`MAX_NODE_CHARS`] bytes.
  ///
  /// [`MAX_NODE_CHARS`]: consts::MAX_NODE_CHARS
  ///
  /// # Examples
  ///
  /// ```
  /// use tether::core::Pid;
  ///
  /// let pid = Pid::new("alpha@localhost", 80, 0, 1).unwrap();
  ///
  /// assert_eq!(pid.node(), "alpha@localhost");
  /// assert!(Pid::new("alpha", 80, 0, 1).is_err());
  /// ```
  pub fn new(node: &str, number: u32, serial: u32, creation: u32) -> Result<Self, PidError> {
    validate_node(node)?;

    Ok(Self {
      hcode: hash_fields(node, number, serial, creation),
      node: Arc::from(node),
      number,
      serial,
      creation,
    })
  }

  /// Returns the name of the node hosting this process.
  #[inline]
  pub fn node(&self) -> &str {
    &self.node
  }

  /// Returns the process slot number.
  #[inline]
  pub const fn number(&self) -> u32 {
    self.number
  }

  /// Returns the slot reuse counter.
  #[inline]
  pub const fn serial(&self) -> u32 {
    self.serial
  }

  /// Returns the node incarnation.
  #[inline]
  pub const fn creation(&self) -> u32 {
    self.creation
  }

  /// Returns the stable hash code of this identifier.
  ///
  /// The value only depends on the identifier fields and is identical on
  /// every node and across restarts.
  #[inline]
  pub const fn hash_code(&self) -> u32 {
    self.hcode
  }
}

impl Hash for Pid {
  #[inline]
  fn hash<H: Hasher>(&self, state: &mut H) {
    state.write_u32(self.hcode);
  }
}

impl Debug for Pid {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    Display::fmt(self, f)
  }
}

impl Display for Pid {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    write!(f, "#PID<{}.{}.{}>", self.node, self.number, self.serial)
  }
}

fn validate_node(node: &str) -> Result<(), PidError> {
  if node.is_empty() {
    return Err(PidError::EmptyNode);
  }

  if node.len() > consts::MAX_NODE_CHARS {
    return Err(PidError::NodeTooLong);
  }

  match node.split_once(consts::NODE_HOST_SEPARATOR) {
    Some((name, host))
      if !name.is_empty() && !host.is_empty() && !host.contains(consts::NODE_HOST_SEPARATOR) =>
    {
      Ok(())
    }
    _ => Err(PidError::BadNodeName),
  }
}

fn hash_fields(node: &str, number: u32, serial: u32, creation: u32) -> u32 {
  let node: u32 = StableHash::new(consts::NODE_HASH_SEED)
    .combine_bytes(node.as_bytes())
    .value();

  StableHash::new(consts::PID_HASH_SEED)
    .combine2(creation, serial)
    .combine2(number, node)
    .value()
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
