#![cfg(loom)]

mod link_table;
mod registry;
mod ulid;
