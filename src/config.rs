use serde::{Deserialize, Serialize};

/// Runtime configuration, resolved at compile time from the environment
/// (`build.rs` loads `.env`). Every key has a documented local default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub backend_url: String,
    pub enable_logging: bool,
    /// Minimum seconds between fetches of the same resource.
    pub fetch_cooldown_seconds: u32,
    pub mail: MailConfig,
}

/// EmailJS credentials for the parcel-arrival notification. Empty keys
/// disable the notification path without affecting parcel creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
}

impl MailConfig {
    pub fn is_configured(&self) -> bool {
        !self.service_id.is_empty() && !self.template_id.is_empty() && !self.public_key.is_empty()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:8000".to_string(),
            enable_logging: true,
            fetch_cooldown_seconds: 5,
            mail: MailConfig {
                service_id: String::new(),
                template_id: String::new(),
                public_key: String::new(),
            },
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            backend_url: option_env!("BACKEND_URL")
                .unwrap_or("http://localhost:8000")
                .to_string(),
            enable_logging: option_env!("ENABLE_LOGGING")
                .unwrap_or("true")
                .parse()
                .unwrap_or(true),
            fetch_cooldown_seconds: option_env!("FETCH_COOLDOWN_SECONDS")
                .unwrap_or("5")
                .parse()
                .unwrap_or(5),
            mail: MailConfig {
                service_id: option_env!("EMAILJS_SERVICE_ID").unwrap_or("").to_string(),
                template_id: option_env!("EMAILJS_TEMPLATE_ID").unwrap_or("").to_string(),
                public_key: option_env!("EMAILJS_PUBLIC_KEY").unwrap_or("").to_string(),
            },
        }
    }

    pub fn fetch_cooldown_ms(&self) -> f64 {
        f64::from(self.fetch_cooldown_seconds) * 1000.0
    }
}

lazy_static::lazy_static! {
    pub static ref CONFIG: AppConfig = AppConfig::from_env();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mail_config_requires_all_three_keys() {
        let mut mail = MailConfig {
            service_id: "svc".to_string(),
            template_id: "tpl".to_string(),
            public_key: "key".to_string(),
        };
        assert!(mail.is_configured());

        mail.public_key.clear();
        assert!(!mail.is_configured());
    }
}
