//! In-memory stores for the three record kinds.
//!
//! Each session owns one instance of each store, so operations take
//! `&mut self` and are atomic from the caller's perspective. Nothing here
//! touches the filesystem; stores live and die with the session.

pub mod assets;
pub mod patches;
pub mod vulnerabilities;

pub use assets::AssetStore;
pub use patches::PatchStore;
pub use vulnerabilities::{AddReport, VulnerabilityStore};
