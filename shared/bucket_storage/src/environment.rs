//! Environment configuration for different deployment stages
//!
//! Opt-in helper for applications that configure themselves from environment
//! variables. The registry, client handles and facade never read it; they only
//! see the [`RegistryOptions`] handed to the builder.

use std::env;
use std::time::Duration;

use tracing::Level;
use tracing_subscriber::{filter::LevelFilter, fmt, EnvFilter};

use crate::{BucketError, BucketResult, RegistryOptions, DEFAULT_REGION, DEFAULT_SIGNED_URL_TTL};

const LOCALSTACK_ENDPOINT: &str = "http://localhost:4566";

/// Application environment configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    /// Production environment
    Production,
    /// Staging environment
    Staging,
    /// Development environment (uses `LocalStack`)
    Development {
        /// Optional override for signed URL lifetime in seconds
        signed_url_ttl_override: Option<u64>,
    },
}

impl Environment {
    /// Creates an Environment from the `APP_ENV` environment variable
    ///
    /// # Errors
    ///
    /// Returns `BucketError::ConfigError` if `APP_ENV` contains an invalid value
    pub fn from_env() -> BucketResult<Self> {
        let env = env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .trim()
            .to_lowercase();

        match env.as_str() {
            "production" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" => {
                let signed_url_ttl_override = env::var("SIGNED_URL_TTL_SECS")
                    .ok()
                    .and_then(|val| val.parse::<u64>().ok());

                Ok(Self::Development {
                    signed_url_ttl_override,
                })
            }
            _ => Err(BucketError::ConfigError(format!("Invalid environment: {env}"))),
        }
    }

    /// Region of the registered buckets, `S3_REGION` or the default
    #[must_use]
    pub fn region(&self) -> String {
        env::var("S3_REGION")
            .ok()
            .filter(|region| !region.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_REGION.to_string())
    }

    /// Returns the endpoint URL to use for S3
    #[must_use]
    pub const fn override_aws_endpoint_url(&self) -> Option<&str> {
        match self {
            Self::Production | Self::Staging => None,
            Self::Development { .. } => Some(LOCALSTACK_ENDPOINT),
        }
    }

    /// Lifetime of presigned GET URLs
    #[must_use]
    pub fn signed_url_ttl(&self) -> Duration {
        match self {
            Self::Production | Self::Staging => DEFAULT_SIGNED_URL_TTL,
            Self::Development {
                signed_url_ttl_override,
            } => signed_url_ttl_override.map_or(DEFAULT_SIGNED_URL_TTL, Duration::from_secs),
        }
    }

    /// Registry options for this environment
    #[must_use]
    pub fn registry_options(&self) -> RegistryOptions {
        RegistryOptions {
            region: self.region(),
            signed_url_ttl: self.signed_url_ttl(),
            endpoint_url: self.override_aws_endpoint_url().map(ToString::to_string),
            // LocalStack does not resolve virtual-hosted bucket names
            force_path_style: matches!(self, Self::Development { .. }),
        }
    }

    /// Log level, `TRACING_LEVEL` or the environment default
    #[must_use]
    pub fn tracing_level(&self) -> Level {
        env::var("TRACING_LEVEL")
            .ok()
            .and_then(|val| val.parse::<Level>().ok())
            .unwrap_or(match self {
                Self::Production | Self::Staging => Level::INFO,
                Self::Development { .. } => Level::DEBUG,
            })
    }

    /// Installs a global tracing subscriber
    ///
    /// JSON output for staging/production, plain text for development.
    /// Does nothing if a subscriber is already installed.
    pub fn init_tracing(&self) {
        let filter = EnvFilter::builder()
            .with_default_directive(LevelFilter::from_level(self.tracing_level()).into())
            .from_env_lossy();

        let result = match self {
            Self::Production | Self::Staging => fmt().json().with_env_filter(filter).try_init(),
            Self::Development { .. } => fmt().with_env_filter(filter).try_init(),
        };

        if result.is_err() {
            tracing::debug!("Tracing subscriber already installed");
        }
    }
}
