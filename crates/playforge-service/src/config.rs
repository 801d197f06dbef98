//! Service configuration.

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address to listen on (default: "0.0.0.0:8080").
    pub listen_addr: String,

    /// Path to `RocksDB` data directory (default: "/data/playforge").
    pub data_dir: String,

    /// Directory holding uploaded game content (default:
    /// "/data/playforge-content").
    pub content_dir: String,

    /// Directory games are staged into for serving (default:
    /// "/data/playforge-serve").
    pub serve_dir: String,

    /// HS256 signing secret for session tokens.
    pub jwt_secret: String,

    /// Token issuer claim (default: "playforge").
    pub jwt_issuer: String,

    /// Token audience claim (default: "playforge").
    pub jwt_audience: String,

    /// Session token lifetime in days (default: 7).
    pub token_ttl_days: i64,

    /// Bcrypt cost factor for password hashing.
    pub bcrypt_cost: u32,

    /// Mail API URL for purchase notifications (optional).
    pub mail_api_url: Option<String>,

    /// Mail API key (optional).
    pub mail_api_key: Option<String>,

    /// Sender address for notification mail.
    pub mail_from: String,

    /// Maximum recommendations returned per request.
    pub recommendation_limit: usize,

    /// CORS allowed origins.
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    pub request_timeout_seconds: u64,
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set - using an insecure development secret");
            "playforge-dev-secret".into()
        });

        Self {
            listen_addr: std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            data_dir: std::env::var("DATA_DIR").unwrap_or_else(|_| "/data/playforge".into()),
            content_dir: std::env::var("CONTENT_DIR")
                .unwrap_or_else(|_| "/data/playforge-content".into()),
            serve_dir: std::env::var("SERVE_DIR")
                .unwrap_or_else(|_| "/data/playforge-serve".into()),
            jwt_secret,
            jwt_issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "playforge".into()),
            jwt_audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "playforge".into()),
            token_ttl_days: std::env::var("TOKEN_TTL_DAYS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(7),
            bcrypt_cost: std::env::var("BCRYPT_COST")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(bcrypt::DEFAULT_COST),
            mail_api_url: std::env::var("MAIL_API_URL").ok(),
            mail_api_key: std::env::var("MAIL_API_KEY").ok(),
            mail_from: std::env::var("MAIL_FROM")
                .unwrap_or_else(|_| "noreply@playforge.dev".into()),
            recommendation_limit: std::env::var("RECOMMENDATION_LIMIT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".into())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            max_body_bytes: std::env::var("MAX_BODY_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1024 * 1024), // 1MB
            request_timeout_seconds: std::env::var("REQUEST_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".into(),
            data_dir: "/data/playforge".into(),
            content_dir: "/data/playforge-content".into(),
            serve_dir: "/data/playforge-serve".into(),
            jwt_secret: "playforge-dev-secret".into(),
            jwt_issuer: "playforge".into(),
            jwt_audience: "playforge".into(),
            token_ttl_days: 7,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            mail_api_url: None,
            mail_api_key: None,
            mail_from: "noreply@playforge.dev".into(),
            recommendation_limit: 10,
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 30,
        }
    }
}
