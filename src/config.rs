use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub port: u16,
    pub public_base_url: String,

    // Email relay
    pub resend_api_key: String,
    pub email_api_url: String,
    pub contact_from: String,
    pub contact_to: String,

    // Bot verification; verification is skipped when no secret is set
    pub recaptcha_secret_key: Option<String>,
    pub recaptcha_verify_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Server
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
            public_base_url: std::env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "https://brightflow.antesto.fi".to_string()),

            // Email relay
            resend_api_key: std::env::var("RESEND_API_KEY")
                .context("RESEND_API_KEY not set")?,
            email_api_url: std::env::var("EMAIL_API_URL")
                .unwrap_or_else(|_| "https://api.resend.com".to_string()),
            contact_from: std::env::var("CONTACT_FROM")
                .unwrap_or_else(|_| "BrightFlow <noreply@antesto.fi>".to_string()),
            contact_to: std::env::var("CONTACT_TO")
                .unwrap_or_else(|_| "myynti@antesto.fi".to_string()),

            // Bot verification
            recaptcha_secret_key: std::env::var("RECAPTCHA_SECRET_KEY")
                .ok()
                .filter(|v| !v.is_empty()),
            recaptcha_verify_url: std::env::var("RECAPTCHA_VERIFY_URL")
                .unwrap_or_else(|_| "https://www.google.com/recaptcha/api/siteverify".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            "PORT",
            "PUBLIC_BASE_URL",
            "RESEND_API_KEY",
            "EMAIL_API_URL",
            "CONTACT_FROM",
            "CONTACT_TO",
            "RECAPTCHA_SECRET_KEY",
            "RECAPTCHA_VERIFY_URL",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_from_env_requires_api_key() {
        clear_env();
        assert!(Config::from_env().is_err());
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        std::env::set_var("RESEND_API_KEY", "test-key");

        let config = Config::from_env().expect("config should load");
        assert_eq!(config.port, 8080);
        assert_eq!(config.public_base_url, "https://brightflow.antesto.fi");
        assert_eq!(config.email_api_url, "https://api.resend.com");
        assert_eq!(config.contact_to, "myynti@antesto.fi");
        assert!(config.recaptcha_secret_key.is_none());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        std::env::set_var("RESEND_API_KEY", "test-key");
        std::env::set_var("PORT", "3000");
        std::env::set_var("RECAPTCHA_SECRET_KEY", "secret");
        std::env::set_var("EMAIL_API_URL", "http://localhost:9999");

        let config = Config::from_env().expect("config should load");
        assert_eq!(config.port, 3000);
        assert_eq!(config.recaptcha_secret_key.as_deref(), Some("secret"));
        assert_eq!(config.email_api_url, "http://localhost:9999");

        clear_env();
    }

    #[test]
    #[serial]
    fn test_empty_recaptcha_secret_counts_as_unset() {
        clear_env();
        std::env::set_var("RESEND_API_KEY", "test-key");
        std::env::set_var("RECAPTCHA_SECRET_KEY", "");

        let config = Config::from_env().expect("config should load");
        assert!(config.recaptcha_secret_key.is_none());

        clear_env();
    }
}
