//! Outbound HTTP plumbing shared by the notification providers.

pub mod client;

pub use client::HTTP_CLIENT;
