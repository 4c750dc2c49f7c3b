//! API Client
//!
//! HTTP helpers for the resume backend.

pub mod client;

pub use client::{api_request, query_fn, upload_resume, Method};
