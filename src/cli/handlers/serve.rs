//! Serve command handler.
//!
//! The real server startup lives in `main.rs`; this handler only covers
//! `serve --dry-run`, which validates the merged settings and prints what
//! a real start would use. All the checking itself belongs to the config
//! layer, so a passing dry run means `Settings::validate` passed.

use crate::config::settings::Settings;
use crate::error::AppResult;

/// Handler for the serve command
pub struct ServeCommandHandler {
    config: Settings,
}

impl ServeCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Runs the dry-run check; a plain `serve` is a no-op here because
    /// the caller starts the server itself.
    pub async fn execute(&self, dry_run: bool) -> AppResult<()> {
        if !dry_run {
            return Ok(());
        }

        self.config.validate()?;
        println!("Configuration is valid");
        for line in self.summary() {
            println!("  {}", line);
        }
        Ok(())
    }

    /// Deployment summary shown after a successful dry run.
    fn summary(&self) -> Vec<String> {
        let providers = &self.config.providers;

        let sms = match providers.sms.active.as_str() {
            "bulksms" if providers.bulksms.is_some() => "bulksms",
            "unifonic" if providers.unifonic.is_some() => "unifonic",
            _ => "none",
        };
        let configured = |present: bool| if present { "configured" } else { "not configured" };

        let watcher = if self.config.watcher.enabled {
            format!(
                "notifies {} via {}",
                self.config.watcher.organizer_recipient, self.config.watcher.channel
            )
        } else {
            "disabled".to_string()
        };

        vec![
            format!("bind address:  {}", self.config.server.address()),
            format!("sms provider:  {}", sms),
            format!("whatsapp:      {}", configured(providers.whatsapp.is_some())),
            format!("push (fcm):    {}", configured(providers.fcm.is_some())),
            format!("guest watcher: {}", watcher),
        ]
    }
}
