//! Link signals, the transport seam, and runtime configuration.
//!
//! - [`Signal`]: Link control signals exchanged between processes
//! - [`Reaction`]: What a caller must do after a signal was applied
//! - [`Transport`]: Delivery interface for outbound signals
//! - [`LinkConfig`]: Registry and tracing configuration

mod config;
mod signal;
mod transport;

pub(crate) use self::signal::SignalRecv;

pub use self::config::LinkConfig;
pub use self::signal::Reaction;
pub use self::signal::Signal;
pub use self::signal::SignalExit;
pub use self::signal::SignalLink;
pub use self::signal::SignalUnlink;
pub use self::signal::SignalUnlinkAck;
pub use self::transport::Transport;
