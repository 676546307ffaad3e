//! API request handlers organized by domain.

pub mod dashboard;
pub mod guests;
pub mod health;
pub mod notifications;
pub mod relay;
