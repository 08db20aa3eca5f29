//! # svc-profile
//!
//! Identity model for profiles attached to running service instances:
//!
//! - **Token**: 12-byte, globally unique, time-sortable instance handle with a
//!   20-character canonical string form
//! - **Service**: name, build id, token, labels and UTC creation time of one
//!   running instance
//! - **Profile**: a profile kind optionally owned by a service instance
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         svc-profile                          │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌──────────────────┐   ┌──────────────┐   ┌──────────────┐  │
//! │  │  ServiceFactory  │ → │  Generator   │   │    Domain    │  │
//! │  │  (service layer) │ → │  + Clock     │   │    Models    │  │
//! │  └──────────────────┘   └──────────────┘   └──────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

pub mod config;
pub mod domain;
pub mod error;
pub mod service;

use tracing::{error, info};

use crate::config::AppConfig;
use crate::domain::Service;
use crate::error::AppError;

pub use crate::domain::{Labels, Profile, ProfileType, Token};
pub use crate::service::ServiceFactory;

/// Mint and print the identity of this process.
///
/// This function:
/// 1. Loads `.env`, configuration files and environment
/// 2. Initializes logging
/// 3. Creates the `Service` record for this instance
/// 4. Prints it as JSON on stdout
///
/// # Errors
///
/// Returns an error if configuration cannot be loaded or the record cannot
/// be serialized.
pub fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().map_err(report)?;

    init_logging(&config);

    let service = Service::new(
        config.service.name.as_str(),
        config.service.build_id.as_str(),
        config.service.labels(),
    );

    info!(
        version = env!("CARGO_PKG_VERSION"),
        name = service.name(),
        build_id = service.build_id(),
        token = %service.token(),
        created_at = %service.created_at(),
        "Service instance identity minted"
    );

    println!("{}", service.to_json_pretty().map_err(report)?);
    Ok(())
}

/// Log a failure with its error code and attach the code to the error chain.
fn report(err: AppError) -> anyhow::Error {
    let code = err.error_code();
    error!(
        error_code = code.as_i32(),
        category = %code.category(),
        message = %err,
        "svc-profile failed"
    );
    anyhow::Error::new(err).context(format!("{} error {code}", code.category()))
}

/// Initialize logging based on configuration.
///
/// Logs go to stderr so stdout carries only the JSON record.
fn init_logging(config: &AppConfig) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.observability.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.observability.log_format == "json" {
        subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
