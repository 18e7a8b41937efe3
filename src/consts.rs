// -----------------------------------------------------------------------------
// System - Types
// -----------------------------------------------------------------------------

/// Maximum number of bytes in the node name of a [`Pid`].
///
/// [`Pid`]: crate::core::Pid
pub const MAX_NODE_CHARS: usize = 255;

/// Separator between the name and host halves of a node name.
pub const NODE_HOST_SEPARATOR: char = '@';

// -----------------------------------------------------------------------------
// System - Hashing
// -----------------------------------------------------------------------------

/// Seed used when mixing the node name of a [`Pid`].
///
/// [`Pid`]: crate::core::Pid
pub const NODE_HASH_SEED: u32 = 1;

/// Seed used when mixing the numeric fields of a [`Pid`].
///
/// [`Pid`]: crate::core::Pid
pub const PID_HASH_SEED: u32 = 5;

/// Seed used when mixing the endpoint hashes of a [`Link`].
///
/// [`Link`]: crate::link::Link
pub const LINK_HASH_SEED: u32 = 5;

// -----------------------------------------------------------------------------
// System - Memory Allocation
// -----------------------------------------------------------------------------

/// Number of pre-allocated entries in a link table.
pub const CAP_LINK_TABLE: usize = 8;

/// Number of pre-allocated link tables in a registry.
pub const CAP_LINK_REGISTRY: usize = 64;

// -----------------------------------------------------------------------------
// System - Registry Behavior
// -----------------------------------------------------------------------------

/// Whether registries drop link tables that become empty by default.
pub const PRUNE_EMPTY_TABLES: bool = true;
