use anyhow::{Context, Result};

const DEFAULT_BUCKET: &str = "cvs";
const DEFAULT_REGION: &str = "us-east-1";

/// Origins of the résumé form front-ends allowed when `CORS_ALLOWED_ORIGINS` is unset.
const DEFAULT_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "http://localhost:3001",
    "http://localhost:5173",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:3001",
    "http://127.0.0.1:5173",
];

/// Application configuration loaded from environment variables.
/// Storage settings are optional: when incomplete the service runs without archival.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub cors_allowed_origins: Vec<String>,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Default)]
pub struct StorageConfig {
    pub bucket: String,
    pub s3: Option<S3Settings>,
    pub supabase: Option<SupabaseSettings>,
}

/// S3-compatible endpoint (MinIO locally, AWS or a Supabase S3 gateway in production).
#[derive(Debug, Clone)]
pub struct S3Settings {
    pub endpoint: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
}

#[derive(Debug, Clone)]
pub struct SupabaseSettings {
    /// Project URL, always ending with `/`.
    pub url: String,
    pub service_role_key: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests need not touch the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = get("PORT")
            .unwrap_or_else(|| "8000".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        let cors_allowed_origins = match get("CORS_ALLOWED_ORIGINS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect(),
            None => DEFAULT_ORIGINS.iter().map(|o| o.to_string()).collect(),
        };

        let s3 = match (
            get("S3_ENDPOINT"),
            get("AWS_ACCESS_KEY_ID"),
            get("AWS_SECRET_ACCESS_KEY"),
        ) {
            (Some(endpoint), Some(access_key_id), Some(secret_access_key)) => Some(S3Settings {
                endpoint,
                region: get("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
                access_key_id,
                secret_access_key,
            }),
            _ => None,
        };

        let supabase = match (get("SUPABASE_URL"), get("SUPABASE_SERVICE_ROLE_KEY")) {
            (Some(url), Some(service_role_key)) => Some(SupabaseSettings {
                url: with_trailing_slash(url),
                service_role_key,
            }),
            _ => None,
        };

        Ok(Config {
            port,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            cors_allowed_origins,
            storage: StorageConfig {
                bucket: get("STORAGE_BUCKET").unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
                s3,
                supabase,
            },
        })
    }
}

fn with_trailing_slash(mut url: String) -> String {
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}
