//! In-process backend for the Syllabus course client.
//!
//! Implements every collaborator trait of `syllabus-core` over plain
//! collections behind a [`tokio::sync::RwLock`]. It enforces the same rules
//! as the REST backend (premium gating, one enrollment per pair, star range)
//! so offline runs and tests see realistic failures.

mod seed;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use seed::{demo_courses, demo_users};
pub use store::MemoryStore;
