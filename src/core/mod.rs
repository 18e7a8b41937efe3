//! Core types shared by the link table and the signal protocol.
//!
//! - [`Pid`]: Node-scoped process identifier
//! - [`Exit`]: Process termination reason
//! - [`StableHash`]: Run-independent hash accumulator
//! - [`PidError`], [`SelfLinkError`], [`InitError`]: Boundary errors

mod error;
mod types;

pub use self::error::InitError;
pub use self::error::PidError;
pub use self::error::SelfLinkError;
pub use self::types::Exit;
pub use self::types::Pid;
pub use self::types::StableHash;
