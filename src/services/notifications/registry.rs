//! Registry of configured notification providers, keyed by channel.
//!
//! Providers are built once from `[providers]` configuration at startup
//! and shared behind `Arc` for the lifetime of the process. A channel
//! with no configured provider is simply absent from the registry.

use std::sync::Arc;

use super::bulksms_provider::BulkSmsProvider;
use super::fcm_provider::FcmProvider;
use super::provider::NotificationProvider;
use super::unifonic_provider::UnifonicProvider;
use super::whatsapp_provider::WhatsAppProvider;
use crate::config::ProvidersConfig;
use crate::models::ChannelKind;

/// Holds at most one provider per delivery channel
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    sms: Option<Arc<dyn NotificationProvider>>,
    whatsapp: Option<Arc<dyn NotificationProvider>>,
    push: Option<Arc<dyn NotificationProvider>>,
}

impl ProviderRegistry {
    /// Creates a registry with no providers configured
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds the registry from provider configuration
    ///
    /// The SMS slot follows `providers.sms.active`; WhatsApp and FCM are
    /// registered whenever their sections are present.
    pub fn from_settings(config: &ProvidersConfig) -> Self {
        let mut registry = Self::empty();
        let country_code = config.default_country_code.clone();

        match config.sms.active.as_str() {
            "bulksms" => {
                if let Some(bulksms) = &config.bulksms {
                    registry.register(Arc::new(BulkSmsProvider::new(
                        bulksms.clone(),
                        country_code.clone(),
                    )));
                }
            }
            "unifonic" => {
                if let Some(unifonic) = &config.unifonic {
                    registry.register(Arc::new(UnifonicProvider::new(
                        unifonic.clone(),
                        country_code.clone(),
                    )));
                }
            }
            other => {
                tracing::warn!(provider = %other, "Unknown SMS provider name, SMS channel disabled");
            }
        }

        if let Some(whatsapp) = &config.whatsapp {
            registry.register(Arc::new(WhatsAppProvider::new(
                whatsapp.clone(),
                country_code.clone(),
            )));
        }

        if let Some(fcm) = &config.fcm {
            registry.register(Arc::new(FcmProvider::new(fcm.clone())));
        }

        registry
    }

    /// Registers a provider in the slot for its channel, replacing any
    /// previous one
    pub fn register(&mut self, provider: Arc<dyn NotificationProvider>) {
        tracing::info!(
            provider = provider.name(),
            channel = %provider.channel(),
            "Registered notification provider"
        );
        match provider.channel() {
            ChannelKind::Sms => self.sms = Some(provider),
            ChannelKind::Whatsapp => self.whatsapp = Some(provider),
            ChannelKind::Push => self.push = Some(provider),
        }
    }

    /// Looks up the provider serving a channel
    pub fn get(&self, channel: ChannelKind) -> Option<&Arc<dyn NotificationProvider>> {
        match channel {
            ChannelKind::Sms => self.sms.as_ref(),
            ChannelKind::Whatsapp => self.whatsapp.as_ref(),
            ChannelKind::Push => self.push.as_ref(),
        }
    }

    /// Lists the channels that currently have a provider
    pub fn configured_channels(&self) -> Vec<ChannelKind> {
        let mut channels = Vec::new();
        if self.sms.is_some() {
            channels.push(ChannelKind::Sms);
        }
        if self.whatsapp.is_some() {
            channels.push(ChannelKind::Whatsapp);
        }
        if self.push.is_some() {
            channels.push(ChannelKind::Push);
        }
        channels
    }
}
