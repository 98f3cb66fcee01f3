use clap::{Parser, ValueEnum};
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;

pub const LISTEN_ADDR_ENV: &str = "TINYFIX_GATEWAY_LISTEN_ADDR";
pub const FQDN_ENV: &str = "TINYFIX_GATEWAY_FQDN";
pub const SCHEME_ENV: &str = "TINYFIX_GATEWAY_SCHEME";
pub const STORAGE_BACKEND_ENV: &str = "TINYFIX_GATEWAY_STORAGE_BACKEND";
pub const REDIS_URL_ENV: &str = "TINYFIX_GATEWAY_REDIS_URL";
pub const REDIS_KEY_PREFIX_ENV: &str = "TINYFIX_GATEWAY_REDIS_KEY_PREFIX";
pub const CODE_MIN_LENGTH_ENV: &str = "TINYFIX_GATEWAY_CODE_MIN_LENGTH";
pub const CODE_MAX_LENGTH_ENV: &str = "TINYFIX_GATEWAY_CODE_MAX_LENGTH";
pub const LOG_FORMAT_ENV: &str = "TINYFIX_GATEWAY_LOG_FORMAT";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:5000";
pub const DEFAULT_FQDN: &str = "localhost";
pub const DEFAULT_SCHEME: &str = "http";
pub const DEFAULT_REDIS_KEY_PREFIX: &str = tinyfix_storage::redis::DEFAULT_KEY_PREFIX;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "redis")]
    Redis,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Redis => write!(f, "redis"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "tinyfix-gateway")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Host short links are served from.
    #[arg(long, env = FQDN_ENV, default_value = DEFAULT_FQDN)]
    pub fqdn: String,

    #[arg(long, env = SCHEME_ENV, default_value = DEFAULT_SCHEME)]
    pub scheme: String,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::InMemory
    )]
    pub storage: StorageBackendArg,

    #[arg(long, env = REDIS_URL_ENV, required_if_eq("storage", "redis"))]
    pub redis_url: Option<String>,

    #[arg(long, env = REDIS_KEY_PREFIX_ENV, default_value = DEFAULT_REDIS_KEY_PREFIX)]
    pub redis_key_prefix: String,

    #[arg(long, env = CODE_MIN_LENGTH_ENV, default_value_t = tinyfix_core::shortcode::MIN_LENGTH)]
    pub code_min_length: usize,

    #[arg(long, env = CODE_MAX_LENGTH_ENV, default_value_t = tinyfix_core::shortcode::MAX_LENGTH)]
    pub code_max_length: usize,

    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value_t = LogFormatArg::Pretty)]
    pub log_format: LogFormatArg,
}
