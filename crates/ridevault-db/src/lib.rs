//! Ridevault DB Library
//!
//! Durable-store collaborator for the upload service: the `UploadStore`
//! trait and its Postgres implementation. Records written here are the
//! discovery path for the download and notification subsystems, which query
//! by the same keys this crate writes.

pub mod db;

pub use db::upload_records::{PgUploadStore, UploadRecord, UploadStore};
