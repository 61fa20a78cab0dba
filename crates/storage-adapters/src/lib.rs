//! # storage-adapters
//!
//! Implementations of `KeyValueStore`.

pub mod memory;

pub use memory::MemoryStore;
