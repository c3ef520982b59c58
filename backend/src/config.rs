//! Process-level configuration for the server binary.
//!
//! Every option can come from the command line or the environment:
//!
//! - `--host` / `HOST`: bind address (default `0.0.0.0`)
//! - `--port` / `PORT`: bind port (default `5000`)
//! - `--debug` / `APP_DEBUG`: verbose logging; `APP_ENV=development` also enables it
//! - `--config` / `REPOSITORY_CONFIG`: path to a `repository.toml`

use clap::{builder::BoolishValueParser, ArgAction, Parser};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::PathBuf;

/// Dotted IPv4, `localhost`, `0.0.0.0`, or a `127.x` loopback short form.
static HOST_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^((25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)$|^(localhost|127(\.[0-9]+){0,2}\.[0-9]+|0\.0\.0\.0)$",
    )
    .expect("host pattern is a valid regex")
});

/// Validate a bind host; used as the clap value parser for `--host`.
pub fn validate_host(value: &str) -> Result<String, String> {
    if HOST_PATTERN.is_match(value) {
        Ok(value.to_string())
    } else {
        Err(format!("invalid ipv4 or localhost value: '{}'", value))
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "product-server", version, about = "Product CRUD REST API")]
pub struct ServerConfig {
    /// Host to bind to (default: 0.0.0.0 for container compatibility)
    #[arg(long, env = "HOST", default_value = "0.0.0.0", value_parser = validate_host)]
    pub host: String,

    /// Port to bind to
    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Enable debug logging (`APP_DEBUG` accepts 1/0, yes/no, on/off, true/false)
    #[arg(long, env = "APP_DEBUG", action = ArgAction::SetTrue, value_parser = BoolishValueParser::new())]
    pub debug: bool,

    /// Repository configuration file; the environment decides the backend when absent
    #[arg(long, env = "REPOSITORY_CONFIG")]
    pub config: Option<PathBuf>,
}

impl ServerConfig {
    /// `--debug`, or `APP_ENV=development`.
    pub fn debug_enabled(&self) -> bool {
        self.debug
            || std::env::var("APP_ENV")
                .map(|v| v.eq_ignore_ascii_case("development"))
                .unwrap_or(false)
    }

    /// Default log filter when `RUST_LOG` is not set.
    pub fn default_log_filter(&self) -> &'static str {
        if self.debug_enabled() {
            "product_api=debug,tower_http=debug,info"
        } else {
            "info"
        }
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}
