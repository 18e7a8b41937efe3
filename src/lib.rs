//! Tether - BEAM-style process links for Rust.
//!
//! Tether tracks bidirectional links between processes and runs the
//! correlation-id unlink handshake that keeps exit signals from leaking
//! through a link that is being torn down.
//!
//! # Quick Start
//!
//! ```
//! use tether::core::Exit;
//! use tether::core::Pid;
//! use tether::link::LinkTable;
//!
//! let a = Pid::new("a@host", 1, 0, 1).unwrap();
//! let b = Pid::new("b@host", 2, 0, 1).unwrap();
//!
//! let table_a = LinkTable::new(a.clone());
//! let table_b = LinkTable::new(b.clone());
//!
//! // A links to B; B applies the LINK signal.
//! let link = table_a.link(&b).unwrap().unwrap();
//! let _ = table_b.on_peer_signal(link);
//!
//! // B terminates; A receives the exit.
//! for signal in table_b.exit(&Exit::Killed) {
//!   let reaction = table_a.on_peer_signal(signal);
//!   assert_eq!(reaction.delivered_exit(), Some(&Exit::Killed));
//! }
//! ```
//!
//! # Core Modules
//!
//! - [`link`]: Links, link tables, and the per-node registry
//! - [`erts`]: Link signals, transport, and configuration
//! - [`core`]: Core types (PIDs, exit reasons, errors)
//! - [`init`]: Tracing initialization
//! - [`consts`]: Configuration constants

mod bifs;
mod loom;

pub mod consts;
pub mod core;
pub mod erts;
pub mod init;
pub mod link;
