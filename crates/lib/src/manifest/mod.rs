//! Package manifest loading and saving.
//!
//! A manifest maps dependency names to opaque version or reference strings.
//! The [`store`] functions move it between disk and memory; the types module
//! holds the value itself, its errors, and save options.

pub mod store;
mod types;

pub use store::{Probe, load, probe, project_manifest_path, save, save_with, try_load};
pub use types::*;
