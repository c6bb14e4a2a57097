//! Database repositories for the data access layer

pub mod upload_records;
