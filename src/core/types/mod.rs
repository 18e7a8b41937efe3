//! Fundamental value types: process identifiers, exit reasons, and hashing.
//!
//! # Type Categories
//!
//! ## Process Identification
//!
//! - [`Pid`]: Node-scoped process identifier
//!
//! ## Exit Reasons
//!
//! - [`Exit`]: Process termination reason carried along links
//!
//! ## Hashing
//!
//! - [`StableHash`]: Seeded, run-independent hash accumulator

mod exit;
mod hash;
mod pid;

pub use self::exit::Exit;
pub use self::hash::StableHash;
pub use self::pid::Pid;
