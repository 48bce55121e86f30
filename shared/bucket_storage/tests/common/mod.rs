// Not every helper is used in every test, so we allow dead code
#![allow(dead_code)]

use bucket_storage::Environment;

mod localstack;
pub use localstack::*;

/// Setup test environment variables with all the required configuration
pub fn setup_test_env() {
    dotenvy::from_path(".env.example").ok();

    Environment::from_env()
        .unwrap_or(Environment::Development {
            signed_url_ttl_override: None,
        })
        .init_tracing();
}
