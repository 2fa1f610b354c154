//! Service layer for the StartupOcean backend.
//! - Business rules on top of the `models` entities.
//! - Every operation takes the connection and the acting email explicitly.
//! - `ServiceError` display text is what API clients see.

pub mod errors;
pub mod auth;
pub mod mail;
pub mod company_service;
pub mod collaboration_service;
pub mod message_service;
pub mod event_service;
pub mod enquiry_service;
pub mod city_service;
pub mod activity_service;
#[cfg(test)]
pub mod test_support;
