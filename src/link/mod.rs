//! Links between processes and the tables that hold them.
//!
//! - [`Link`]: Undirected link between two processes
//! - [`LinkState`]: Active, pending unlink, or removed
//! - [`LinkTable`]: Thread-safe link set of one process, with the handshake
//! - [`LinkRegistry`]: Per-node collection of link tables
//! - [`UlidCounter`]: Generator of unlink correlation ids

mod link_entity;
mod link_registry;
mod link_state;
mod link_table;
mod ulid;

pub use self::link_entity::Link;
pub use self::link_registry::LinkRegistry;
pub use self::link_state::LinkState;
pub use self::link_table::LinkSet;
pub use self::link_table::LinkTable;
pub use self::ulid::UlidCounter;
