//! Core types and trait definitions for the Syllabus course client.
//!
//! This crate is deliberately free of HTTP and storage dependencies. It holds
//! the course filter engine, the enrollment state resolver and the traits
//! through which both reach the course catalog and enrollment backends.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod course;
pub mod enrollment;
pub mod error;
pub mod filter;
pub mod id;
pub mod resolver;
pub mod review;
pub mod store;
pub mod user;

pub use error::{Error, ResolveError, Result};
