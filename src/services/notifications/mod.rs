//! Notification system with pluggable providers.
//!
//! This module provides the notification system abstraction and
//! implementations. The core trait `NotificationProvider` allows for
//! easy extension to support different delivery channels (SMS,
//! WhatsApp, push, etc.).

mod bulksms_provider;
mod fcm_provider;
mod phone;
mod provider;
mod registry;
mod unifonic_provider;
mod whatsapp_provider;

pub mod notification_service;

pub use bulksms_provider::BulkSmsProvider;
pub use fcm_provider::FcmProvider;
pub use notification_service::NotificationService;
pub use provider::{
    ConnectionCheck, NotificationProvider, SendError, SendRequest, SendResult,
};
pub use registry::ProviderRegistry;
pub use unifonic_provider::UnifonicProvider;
pub use whatsapp_provider::WhatsAppProvider;
