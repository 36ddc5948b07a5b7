//! Upload pipeline and folder lifecycle management
//!
//! Folders move linearly through `extracted → completed → deleted`. The
//! upload pipeline populates the extracted bucket from a zip buffer; the
//! lifecycle manager copies folders to the completed bucket, stamps them,
//! and removes them. Everything here is pure data in, data out — HTTP and
//! presentation live elsewhere.

mod folders;
mod upload;

pub use folders::{FolderLifecycle, MarkDoneOutcome};
pub use upload::store_archive;
