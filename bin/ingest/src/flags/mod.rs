//! CLI flags.

mod globals;
pub(crate) use globals::GlobalArgs;

mod ingest;
pub(crate) use ingest::IngestArgs;

mod store;
pub(crate) use store::StoreArgs;
