use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

use crate::erts::Signal;

/// Delivery interface for outbound link signals.
///
/// Link tables never deliver signals themselves; they return them, and the
/// caller hands them to a `Transport` once the table lock is released.
///
/// Delivery is fire-and-forget. A signal that cannot be delivered is
/// equivalent to one still in flight: a pending unlink stays pending until
/// its acknowledgment or an exit signal from the peer arrives.
pub trait Transport {
  /// Hands `signal` to the delivery layer.
  fn deliver(&self, signal: Signal);

  /// Hands every signal in `signals` to the delivery layer, in order.
  fn deliver_all<I>(&self, signals: I)
  where
    I: IntoIterator<Item = Signal>,
    Self: Sized,
  {
    for signal in signals {
      self.deliver(signal);
    }
  }
}

impl<T> Transport for &T
where
  T: Transport + ?Sized,
{
  #[inline]
  fn deliver(&self, signal: Signal) {
    (**self).deliver(signal)
  }
}

impl<T> Transport for Arc<T>
where
  T: Transport + ?Sized,
{
  #[inline]
  fn deliver(&self, signal: Signal) {
    (**self).deliver(signal)
  }
}

impl Transport for UnboundedSender<Signal> {
  fn deliver(&self, signal: Signal) {
    if let Err(error) = self.send(signal) {
      tracing::trace!(
        signal = %error.0.kind(),
        to = %error.0.to(),
        result = "dropped",
        reason = "closed queue",
      );
    }
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
