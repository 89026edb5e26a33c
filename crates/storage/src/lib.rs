//! Persistent storage of ingested blocks.
//!
//! The [`BlockStorage`] trait is the single source of truth for historical block queries.
//! Two backends are provided: [`MemoryBlockStore`] keeps blocks in process, and
//! [`PostgrestBlockStore`] writes to a `blocks` table exposed over a PostgREST (Supabase) API.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod error;
pub use error::StorageError;

mod traits;
pub use traits::BlockStorage;

mod models;
pub use models::BlockRow;

mod memory;
pub use memory::MemoryBlockStore;

mod postgrest;
pub use postgrest::{PostgrestBlockStore, PostgrestConfig};
