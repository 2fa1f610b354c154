//! Auth module: OTP issuance and verification, bearer tokens.
//!
//! Layered like the rest of the crate: domain types, a repository trait for
//! the company lookup, a one-time-code store, and the service itself.

pub mod domain;
pub mod errors;
pub mod otp;
pub mod repository;
pub mod repo;
pub mod service;
pub mod token;

pub use service::AuthService;
