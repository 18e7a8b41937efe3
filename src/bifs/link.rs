// -----------------------------------------------------------------------------
// Process Link
//
// BEAM Reference:
//   https://github.com/erlang/otp/blob/master/erts/emulator/beam/erl_monitor_link.h
//   https://github.com/erlang/otp/blob/master/erts/emulator/beam/erl_monitor_link.c
// -----------------------------------------------------------------------------

use std::num::NonZeroU64;
use tracing::Span;
use tracing::span;

use crate::core::Exit;
use crate::core::Pid;
use crate::core::SelfLinkError;
use crate::erts::Reaction;
use crate::erts::Signal;
use crate::erts::SignalExit;
use crate::erts::SignalLink;
use crate::erts::SignalRecv;
use crate::erts::SignalUnlink;
use crate::link::Link;
use crate::link::LinkTable;

/// Creates a bidirectional link between the table owner and `peer`.
///
/// # Link Protocol
///
/// 1. Check if link already exists (no-op if active, enable if disabled)
/// 2. Add link to the owner's link table
/// 3. Return LINK signal for the peer
///
/// Re-enabling a disabled link abandons the unlink in flight; its ack will
/// arrive stale and be ignored.
///
/// BEAM Builtin: <https://github.com/erlang/otp/blob/master/erts/emulator/beam/bif.c#L134>
pub(crate) fn link_insert(this: &LinkTable, peer: &Pid) -> Result<Option<Signal>, SelfLinkError> {
  let owner: &Pid = this.owner();

  this.with_links(|links| {
    if let Some(link) = links.get_mut(owner, peer) {
      if link.is_enabled() {
        return Ok(None); // Ignore, we dont need to update an active link
      }

      link.enable();
    } else {
      links.insert(owner, peer)?;
    }

    Ok(Some(SignalLink::new(owner.clone(), peer.clone()).into()))
  })
}

/// Starts removing the bidirectional link between the table owner and `peer`.
///
/// # Unlink Protocol
///
/// 1. Check if link exists (no-op if not)
/// 2. Disable link with unique ID (prevents exit signal races)
/// 3. Return UNLINK signal with ID for the peer
/// 4. Wait for UNLINK_ACK to complete removal
///
/// # Special Cases
///
/// - No-op if no link exists
/// - No-op if link is already disabled
///
/// BEAM Builtin: <https://github.com/erlang/otp/blob/master/erts/emulator/beam/bif.c#L1212>
pub(crate) fn link_remove(this: &LinkTable, peer: &Pid) -> Option<Signal> {
  let owner: &Pid = this.owner();

  this.with_links(|links| {
    let Some(link) = links.get_mut(owner, peer) else {
      return None; // Ignore, we're not linked to PID
    };

    if link.is_disabled() {
      return None; // Ignore, we've been here before
    }

    let unlink: NonZeroU64 = this.next_ulid();

    link.disable(unlink);

    tracing::trace!(%link, ulid = %unlink, "unlink pending");

    Some(SignalUnlink::new(owner.clone(), peer.clone(), unlink).into())
  })
}

/// Forces completion of an unlink whose acknowledgment never arrived.
///
/// Removes the link to `peer` only if it is still pending with `ulid`, as if
/// the peer had exited.
pub(crate) fn link_expire(this: &LinkTable, peer: &Pid, ulid: NonZeroU64) -> Option<Link> {
  let owner: &Pid = this.owner();

  this.with_links(|links| {
    if links.get(owner, peer)?.matches(ulid) {
      tracing::trace!(%peer, %ulid, "unlink expired");
      links.remove(owner, peer)
    } else {
      None
    }
  })
}

/// Removes every link of the terminating table owner.
///
/// # Exit Protocol
///
/// 1. Remove all links touching the owner
/// 2. Return EXIT for every peer whose link was active
///
/// Links with an unlink in flight are dropped silently; the owner already
/// asked to stop receiving exits from them.
pub(crate) fn link_exit(this: &LinkTable, exit: &Exit) -> Vec<Signal> {
  let owner: &Pid = this.owner();

  let span: Span = tracing::trace_span!("Link Exit", pid = %owner, %exit);
  let _enter: span::Entered<'_> = span.enter();

  let removed: Vec<Link> = this.with_links(|links| links.take_containing(owner));
  let mut signals: Vec<Signal> = Vec::with_capacity(removed.len());

  for link in removed {
    let Some(peer) = link.peer_of(owner) else {
      continue;
    };

    if link.is_disabled() {
      tracing::trace!(%peer, result = "ignored", reason = "link disabled");
      continue;
    }

    tracing::trace!(%peer, result = "handled", reason = "active link");

    signals.push(SignalExit::new(owner.clone(), peer.clone(), exit.clone()).into());
  }

  signals
}

/// Applies a signal received from a peer to the owner's link table.
pub(crate) fn link_signal(this: &LinkTable, signal: Signal) -> Reaction {
  let owner: &Pid = this.owner();
  this.with_links(|links| signal.recv(owner, links))
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
