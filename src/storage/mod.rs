//! Persistence of raw notes and generated insights
//!
//! Backends:
//! - `local`: files in a directory, `file://` links
//! - `drive`: Google Drive v3, `webViewLink` links

mod client;
mod drive;
mod local;

pub use client::{file_name, LinkKind, StorageBackendFactory, StorageClient, StorageLink};
pub use drive::{DriveStorage, DRIVE_BASE_URL};
pub use local::LocalStorage;
