//! # PatchWise Test Utils
//!
//! Shared test machinery for the PatchWise crates: a scripted
//! [`Capability`](patchwise_ai::Capability) double that replays queued
//! replies, and canonical fixtures for feeds, scans, and backend replies.
//!
//! Nothing here ships in a production binary; the crate exists so that the
//! pipeline tests in `patchwise-core` and elsewhere script their backends
//! the same way.

pub mod fixtures;
pub mod scripted;

pub use scripted::{RecordedRequest, ScriptedCapability};
