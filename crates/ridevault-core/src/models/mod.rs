//! Domain models

pub mod upload;

pub use upload::{
    LegacyUploadData, LegacyUploadRequest, PartUploadUrl, SessionUploadData, SessionUploadRequest,
    UploadMode, UploadStatus,
};
