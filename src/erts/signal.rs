// Link Signal Handling
//
// # Erlang References
//
// <https://www.erlang.org/doc/system/ref_man_processes#links>
// <https://www.erlang.org/doc/system/ref_man_processes#receiving-exit-signals>
// <https://www.erlang.org/doc/apps/erts/erl_dist_protocol#link_protocol>
use std::num::NonZeroU64;
use tracing::Span;
use tracing::span;

use crate::core::Exit;
use crate::core::Pid;
use crate::erts::Transport;
use crate::link::Link;
use crate::link::LinkSet;

// -----------------------------------------------------------------------------
// Signal Recv
// -----------------------------------------------------------------------------

/// Trait for applying a received signal to a link set.
///
/// Implemented by all signal types to define their handshake transition.
pub(crate) trait SignalRecv {
  /// Applies this signal to the links of `owner`.
  ///
  /// Runs under the table lock; the returned [`Reaction`] carries everything
  /// the caller must do once the lock is released.
  fn recv(self, owner: &Pid, links: &mut LinkSet) -> Reaction;
}

// -----------------------------------------------------------------------------
// Reaction
// -----------------------------------------------------------------------------

/// Outcome of applying a peer signal to a link table.
///
/// - `reply`: signal the caller must forward to the peer (an UNLINK_ACK)
/// - `exit`: exit reason the caller must deliver to the local process
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[must_use = "a reaction may carry a reply that must be forwarded"]
pub struct Reaction {
  reply: Option<Signal>,
  exit: Option<Exit>,
}

impl Reaction {
  /// A reaction with nothing to do.
  #[inline]
  pub const fn none() -> Self {
    Self {
      reply: None,
      exit: None,
    }
  }

  #[inline]
  pub(crate) const fn reply(signal: Signal) -> Self {
    Self {
      reply: Some(signal),
      exit: None,
    }
  }

  #[inline]
  pub(crate) const fn exit(exit: Exit) -> Self {
    Self {
      reply: None,
      exit: Some(exit),
    }
  }

  /// Returns the signal to forward to the peer, if any.
  #[inline]
  pub fn outbound(&self) -> Option<&Signal> {
    self.reply.as_ref()
  }

  /// Returns the exit reason to deliver to the local process, if any.
  #[inline]
  pub fn delivered_exit(&self) -> Option<&Exit> {
    self.exit.as_ref()
  }

  /// Returns `true` if there is nothing to forward or deliver.
  #[inline]
  pub fn is_none(&self) -> bool {
    self.reply.is_none() && self.exit.is_none()
  }

  /// Splits the reaction into its outbound signal and delivered exit.
  #[inline]
  pub fn into_parts(self) -> (Option<Signal>, Option<Exit>) {
    (self.reply, self.exit)
  }

  /// Hands the outbound signal to `transport`, returning the exit reason
  /// to deliver locally.
  #[inline]
  pub fn forward<T>(self, transport: &T) -> Option<Exit>
  where
    T: Transport + ?Sized,
  {
    if let Some(signal) = self.reply {
      transport.deliver(signal);
    }

    self.exit
  }
}

// -----------------------------------------------------------------------------
// Signal
// -----------------------------------------------------------------------------

/// Link control signal exchanged between two processes.
///
/// Every signal names its sender (`from`) and its destination (`to`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Signal {
  /// Establish a link between processes.
  Link(SignalLink),
  /// Request to unlink from a process.
  Unlink(SignalUnlink),
  /// Acknowledgment of an unlink request.
  UnlinkAck(SignalUnlinkAck),
  /// Exit signal from a linked process.
  Exit(SignalExit),
}

impl Signal {
  /// Returns the signal type as a short string.
  #[inline]
  pub const fn kind(&self) -> &'static str {
    match self {
      Self::Link(_) => "link",
      Self::Unlink(_) => "unlink",
      Self::UnlinkAck(_) => "unlink ack",
      Self::Exit(_) => "exit",
    }
  }

  /// Returns the sender PID.
  #[inline]
  pub const fn from(&self) -> &Pid {
    match self {
      Self::Link(signal) => &signal.from,
      Self::Unlink(signal) => &signal.from,
      Self::UnlinkAck(signal) => &signal.from,
      Self::Exit(signal) => &signal.from,
    }
  }

  /// Returns the destination PID.
  #[inline]
  pub const fn to(&self) -> &Pid {
    match self {
      Self::Link(signal) => &signal.to,
      Self::Unlink(signal) => &signal.to,
      Self::UnlinkAck(signal) => &signal.to,
      Self::Exit(signal) => &signal.to,
    }
  }
}

impl SignalRecv for Signal {
  fn recv(self, owner: &Pid, links: &mut LinkSet) -> Reaction {
    let span: Span = tracing::trace_span!(
      "Link Signal",
      type = %self.kind(),
      from = %self.from(),
      to = %self.to(),
    );

    let _enter: span::Entered<'_> = span.enter();

    if self.to() != owner {
      tracing::trace!(result = "ignored", reason = "misdirected");
      return Reaction::none();
    }

    match self {
      Self::Link(signal) => signal.recv(owner, links),
      Self::Unlink(signal) => signal.recv(owner, links),
      Self::UnlinkAck(signal) => signal.recv(owner, links),
      Self::Exit(signal) => signal.recv(owner, links),
    }
  }
}

impl From<SignalLink> for Signal {
  #[inline]
  fn from(other: SignalLink) -> Self {
    Self::Link(other)
  }
}

impl From<SignalUnlink> for Signal {
  #[inline]
  fn from(other: SignalUnlink) -> Self {
    Self::Unlink(other)
  }
}

impl From<SignalUnlinkAck> for Signal {
  #[inline]
  fn from(other: SignalUnlinkAck) -> Self {
    Self::UnlinkAck(other)
  }
}

impl From<SignalExit> for Signal {
  #[inline]
  fn from(other: SignalExit) -> Self {
    Self::Exit(other)
  }
}

// -----------------------------------------------------------------------------
// Signal - Link
// -----------------------------------------------------------------------------

/// Signal to establish a bidirectional link between processes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignalLink {
  from: Pid,
  to: Pid,
}

impl SignalLink {
  #[inline]
  pub const fn new(from: Pid, to: Pid) -> Self {
    Self { from, to }
  }
}

impl SignalRecv for SignalLink {
  /// Establishes a link if one doesn't already exist.
  ///
  /// An existing link, active or being unlinked, is left untouched.
  fn recv(self, owner: &Pid, links: &mut LinkSet) -> Reaction {
    tracing::trace!(signal = "link");

    if links.get(owner, &self.from).is_some() {
      tracing::trace!(result = "ignored", reason = "old link");
      return Reaction::none();
    }

    match links.insert(owner, &self.from) {
      Ok(_) => tracing::trace!(result = "handled", reason = "new link"),
      Err(_) => tracing::trace!(result = "ignored", reason = "self link"),
    }

    Reaction::none()
  }
}

// -----------------------------------------------------------------------------
// Signal - Unlink
// -----------------------------------------------------------------------------

/// Request to remove a bidirectional link.
///
/// Part of the two-phase unlink protocol. The receiver removes the link and
/// replies with an UnlinkAck carrying the same id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignalUnlink {
  from: Pid,
  to: Pid,
  ulid: NonZeroU64,
}

impl SignalUnlink {
  #[inline]
  pub const fn new(from: Pid, to: Pid, ulid: NonZeroU64) -> Self {
    Self { from, to, ulid }
  }

  /// Returns the correlation id of this unlink request.
  #[inline]
  pub const fn ulid(&self) -> NonZeroU64 {
    self.ulid
  }
}

impl SignalRecv for SignalUnlink {
  /// Removes the link and acknowledges the request.
  ///
  /// The acknowledgment is sent in every case so the requesting side can
  /// complete its handshake:
  ///
  /// - **Active link**: removed
  /// - **Pending link**: both sides are unlinking; removed, and the local
  ///   request is satisfied by the removal
  /// - **No link**: nothing to remove
  fn recv(self, owner: &Pid, links: &mut LinkSet) -> Reaction {
    tracing::trace!(signal = "unlink", ulid = %self.ulid);

    match links.take(owner, &self.from) {
      Some(link) if link.is_disabled() => {
        tracing::trace!(result = "handled", reason = "crossed unlink");
      }
      Some(_) => {
        tracing::trace!(result = "handled", reason = "active link");
      }
      None => {
        tracing::trace!(result = "handled", reason = "no link");
      }
    }

    Reaction::reply(SignalUnlinkAck::new(owner.clone(), self.from, self.ulid).into())
  }
}

// -----------------------------------------------------------------------------
// Signal - UnlinkAck
// -----------------------------------------------------------------------------

/// Acknowledgment of an unlink request.
///
/// Completes the two-phase unlink protocol. The requester removes the link
/// if the unlink id matches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignalUnlinkAck {
  from: Pid,
  to: Pid,
  ulid: NonZeroU64,
}

impl SignalUnlinkAck {
  #[inline]
  pub const fn new(from: Pid, to: Pid, ulid: NonZeroU64) -> Self {
    Self { from, to, ulid }
  }

  /// Returns the correlation id being acknowledged.
  #[inline]
  pub const fn ulid(&self) -> NonZeroU64 {
    self.ulid
  }
}

impl SignalRecv for SignalUnlinkAck {
  /// Completes the unlink if the id matches.
  ///
  /// The link is removed only if it is pending with the acknowledged id.
  /// Anything else is a stale acknowledgment:
  ///
  /// - The link was re-enabled by a new link request
  /// - The link was already removed by an exit or a crossed unlink
  fn recv(self, owner: &Pid, links: &mut LinkSet) -> Reaction {
    tracing::trace!(signal = "unlink ack", ulid = %self.ulid);

    let Some(link) = links.get(owner, &self.from) else {
      tracing::trace!(result = "ignored", reason = "no link");
      return Reaction::none();
    };

    if link.is_enabled() {
      tracing::trace!(result = "ignored", reason = "link enabled");
    } else if link.matches(self.ulid) {
      let _unlinked: Option<Link> = links.remove(owner, &self.from);
      tracing::trace!(result = "handled", reason = "fresh ulid");
    } else {
      tracing::trace!(result = "ignored", reason = "stale ulid");
    }

    Reaction::none()
  }
}

// -----------------------------------------------------------------------------
// Signal - Exit
// -----------------------------------------------------------------------------

/// Exit signal from a linked process.
///
/// Sent when a linked process terminates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignalExit {
  from: Pid,
  to: Pid,
  exit: Exit,
}

impl SignalExit {
  #[inline]
  pub const fn new(from: Pid, to: Pid, exit: Exit) -> Self {
    Self { from, to, exit }
  }

  /// Returns the exit reason of the terminated process.
  #[inline]
  pub const fn exit(&self) -> &Exit {
    &self.exit
  }
}

impl SignalRecv for SignalExit {
  /// Tears down the link to the terminated peer.
  ///
  /// - **Active link**: removed, exit delivered to the local process
  /// - **Pending link**: removed, exit not delivered (the local side had
  ///   already asked to unlink)
  /// - **No link**: ignored
  fn recv(self, owner: &Pid, links: &mut LinkSet) -> Reaction {
    tracing::trace!(signal = "exit", exit = %self.exit);

    match links.take(owner, &self.from) {
      Some(link) if link.is_disabled() => {
        tracing::trace!(result = "ignored", reason = "link disabled");
        Reaction::none()
      }
      Some(_) => {
        tracing::trace!(result = "handled", reason = "active link");
        Reaction::exit(self.exit)
      }
      None => {
        tracing::trace!(result = "ignored", reason = "no link");
        Reaction::none()
      }
    }
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
