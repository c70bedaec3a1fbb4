//! HTTP backend for the Syllabus course client.
//!
//! [`ApiClient`] implements the `syllabus-core` collaborator traits against
//! the course REST API. Transport failures and backend rejections are kept
//! apart so a rejection's message can be shown to the user untouched.

mod client;
mod envelope;

pub mod error;

pub use client::{ApiClient, ApiConfig};
pub use error::{Error, Result};
