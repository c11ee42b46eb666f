use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except secrets have defaults suitable for local development.
/// Everything is read once at process start; there is no dynamic reload.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `4000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Public base URL of this server, used to build upload URLs.
    pub base_url: String,
    /// Base URL of the web client, used for checkout redirect targets.
    pub client_url: String,
    /// Directory uploaded files are stored in (default: `uploads`).
    pub upload_dir: String,
    /// Base URL of the external story-AI service.
    pub ai_base_url: String,
    /// Payment-processor secret API key.
    pub stripe_secret_key: String,
    /// Shared secret for webhook signature verification.
    pub stripe_webhook_secret: String,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                    |
    /// |-------------------------|----------------------------|
    /// | `HOST`                  | `0.0.0.0`                  |
    /// | `PORT`                  | `4000`                     |
    /// | `CORS_ORIGINS`          | `http://localhost:3000`    |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                       |
    /// | `BASE_URL`              | `http://localhost:4000`    |
    /// | `CLIENT_URL`            | `http://localhost:3000`    |
    /// | `UPLOAD_DIR`            | `uploads`                  |
    /// | `AI_BASE_URL`           | --  (**required**)         |
    /// | `STRIPE_SECRET_KEY`     | --  (**required**)         |
    /// | `STRIPE_WEBHOOK_SECRET` | --  (**required**)         |
    ///
    /// # Panics
    ///
    /// Panics if a required variable is missing; misconfiguration should
    /// fail at startup, not on the first request.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "4000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let base_url = std::env::var("BASE_URL")
            .unwrap_or_else(|_| "http://localhost:4000".into())
            .trim_end_matches('/')
            .to_string();

        let client_url = std::env::var("CLIENT_URL")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .trim_end_matches('/')
            .to_string();

        let upload_dir = std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".into());

        let ai_base_url = std::env::var("AI_BASE_URL").expect("AI_BASE_URL must be set");

        let stripe_secret_key =
            std::env::var("STRIPE_SECRET_KEY").expect("STRIPE_SECRET_KEY must be set");

        let stripe_webhook_secret =
            std::env::var("STRIPE_WEBHOOK_SECRET").expect("STRIPE_WEBHOOK_SECRET must be set");

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            base_url,
            client_url,
            upload_dir,
            ai_base_url,
            stripe_secret_key,
            stripe_webhook_secret,
            jwt,
        }
    }
}
