//! pkgmanifest-lib: package manifest persistence.
//!
//! A package manifest (`Packages/manifest.json`) maps dependency names to
//! opaque version or reference strings. This crate provides:
//! - `manifest::load`: read a manifest, failing loudly
//! - `manifest::try_load` / `manifest::probe`: read a manifest that may be missing
//! - `manifest::save`: write a manifest, replacing the file atomically

pub mod consts;
pub mod manifest;
