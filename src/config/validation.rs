//! Validation for loaded settings.
//!
//! Each configuration section validates itself; [`Settings::validate`]
//! chains them and adds the cross-section checks that no single section
//! can decide on its own.

use super::error::{ConfigError, ConfigResult};
use super::settings::{
    ApplicationConfig, BulkSmsConfig, DatabaseConfig, FcmConfig, ProvidersConfig, ServerConfig,
    Settings, SmsRouting, UnifonicConfig, WatcherConfig, WhatsAppConfig,
};

/// Provider names accepted in `providers.sms.active`.
pub const SMS_PROVIDER_NAMES: &[&str] = &["bulksms", "unifonic"];

fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

fn require_non_empty(field: &str, value: &str) -> ConfigResult<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::validation(field, "must not be empty"));
    }
    Ok(())
}

fn require_http_url(field: &str, value: &str) -> ConfigResult<()> {
    require_non_empty(field, value)?;
    if !is_http_url(value) {
        return Err(ConfigError::validation(
            field,
            "must start with http:// or https://",
        ));
    }
    Ok(())
}

impl ApplicationConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        require_non_empty("application.name", &self.name)
    }
}

impl ServerConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        require_non_empty("server.host", &self.host)?;
        if self.port == 0 {
            return Err(ConfigError::validation("server.port", "must be non-zero"));
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        require_non_empty("database.url", &self.url)?;
        if !Self::is_valid_database_url(&self.url) {
            return Err(ConfigError::validation(
                "database.url",
                "must start with postgres:// or postgresql://",
            ));
        }
        if self.max_connections == 0 {
            return Err(ConfigError::validation(
                "database.max_connections",
                "must be at least 1",
            ));
        }
        if self.connect_timeout_seconds == 0 {
            return Err(ConfigError::validation(
                "database.connect_timeout_seconds",
                "must be at least 1",
            ));
        }
        Ok(())
    }

    fn is_valid_database_url(url: &str) -> bool {
        url.starts_with("postgres://") || url.starts_with("postgresql://")
    }
}

impl SmsRouting {
    pub fn validate(&self) -> ConfigResult<()> {
        if !SMS_PROVIDER_NAMES.contains(&self.active.as_str()) {
            return Err(ConfigError::validation(
                "providers.sms.active",
                format!(
                    "unknown provider '{}', expected one of: {}",
                    self.active,
                    SMS_PROVIDER_NAMES.join(", ")
                ),
            ));
        }
        Ok(())
    }
}

impl BulkSmsConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        require_non_empty("providers.bulksms.username", &self.username)?;
        require_non_empty("providers.bulksms.password", &self.password)?;
        require_http_url("providers.bulksms.base_url", &self.base_url)
    }
}

impl UnifonicConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        require_non_empty("providers.unifonic.app_sid", &self.app_sid)?;
        require_non_empty("providers.unifonic.sender_id", &self.sender_id)?;
        require_http_url("providers.unifonic.base_url", &self.base_url)
    }
}

impl WhatsAppConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        require_non_empty("providers.whatsapp.access_token", &self.access_token)?;
        require_non_empty("providers.whatsapp.phone_number_id", &self.phone_number_id)?;
        require_http_url("providers.whatsapp.api_base", &self.api_base)?;
        require_non_empty(
            "providers.whatsapp.template_language",
            &self.template_language,
        )
    }
}

impl FcmConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        require_non_empty("providers.fcm.server_key", &self.server_key)?;
        require_http_url("providers.fcm.endpoint", &self.endpoint)
    }
}

impl ProvidersConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        let code = &self.default_country_code;
        if code.is_empty() || code.len() > 3 || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(ConfigError::validation(
                "providers.default_country_code",
                "must be 1 to 3 digits",
            ));
        }

        self.sms.validate()?;

        // Routing SMS at a provider that has no section while another
        // one is fully configured is always a mistake.
        let has_any_sms_section = self.bulksms.is_some() || self.unifonic.is_some();
        let active_has_section = match self.sms.active.as_str() {
            "bulksms" => self.bulksms.is_some(),
            "unifonic" => self.unifonic.is_some(),
            _ => false,
        };
        if has_any_sms_section && !active_has_section {
            return Err(ConfigError::validation(
                "providers.sms.active",
                format!(
                    "active provider '{}' has no [providers.{}] section",
                    self.sms.active, self.sms.active
                ),
            ));
        }

        if let Some(bulksms) = &self.bulksms {
            bulksms.validate()?;
        }
        if let Some(unifonic) = &self.unifonic {
            unifonic.validate()?;
        }
        if let Some(whatsapp) = &self.whatsapp {
            whatsapp.validate()?;
        }
        if let Some(fcm) = &self.fcm {
            fcm.validate()?;
        }
        Ok(())
    }
}

impl WatcherConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.enabled {
            require_non_empty("watcher.organizer_recipient", &self.organizer_recipient)?;
        }
        Ok(())
    }
}

impl Settings {
    /// Validates every section plus the cross-section constraints.
    pub fn validate(&self) -> ConfigResult<()> {
        self.application.validate()?;
        self.server.validate()?;
        self.database.validate()?;
        self.logger
            .validate()
            .map_err(|e| ConfigError::validation("logger", e.to_string()))?;
        self.providers.validate()?;
        self.watcher.validate()?;
        Ok(())
    }
}
