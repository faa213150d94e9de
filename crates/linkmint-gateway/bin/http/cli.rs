use clap::{Parser, ValueEnum};
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;

pub const LISTEN_ADDR_ENV: &str = "LINKMINT_LISTEN_ADDR";
pub const PUBLIC_BASE_URL_ENV: &str = "LINKMINT_PUBLIC_BASE_URL";
pub const STORAGE_BACKEND_ENV: &str = "LINKMINT_STORAGE_BACKEND";
pub const MYSQL_DSN_ENV: &str = "LINKMINT_MYSQL_DSN";
pub const SINK_BACKEND_ENV: &str = "LINKMINT_SINK_BACKEND";
pub const REDIS_URL_ENV: &str = "LINKMINT_REDIS_URL";
pub const REDIS_KEY_PREFIX_ENV: &str = "LINKMINT_REDIS_KEY_PREFIX";
pub const CODE_LENGTH_ENV: &str = "LINKMINT_CODE_LENGTH";
pub const MAX_ATTEMPTS_ENV: &str = "LINKMINT_MAX_ATTEMPTS";
pub const STORE_TIMEOUT_MS_ENV: &str = "LINKMINT_STORE_TIMEOUT_MS";
pub const LOG_FORMAT_ENV: &str = "LINKMINT_LOG_FORMAT";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_REDIS_KEY_PREFIX: &str = "lm:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "mysql")]
    Mysql,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Mysql => write!(f, "mysql"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SinkBackendArg {
    #[value(name = "none")]
    None,
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "redis")]
    Redis,
}

impl Display for SinkBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SinkBackendArg::None => write!(f, "none"),
            SinkBackendArg::InMemory => write!(f, "in-memory"),
            SinkBackendArg::Redis => write!(f, "redis"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "linkmint")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Prefix used to build `short_url` in responses.
    #[arg(long, env = PUBLIC_BASE_URL_ENV, default_value = DEFAULT_PUBLIC_BASE_URL)]
    pub public_base_url: String,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::InMemory
    )]
    pub storage: StorageBackendArg,

    #[arg(long, env = MYSQL_DSN_ENV, required_if_eq("storage", "mysql"))]
    pub mysql_dsn: Option<String>,

    #[arg(
        long,
        env = SINK_BACKEND_ENV,
        value_enum,
        default_value_t = SinkBackendArg::InMemory
    )]
    pub sink: SinkBackendArg,

    #[arg(long, env = REDIS_URL_ENV, required_if_eq("sink", "redis"))]
    pub redis_url: Option<String>,

    #[arg(long, env = REDIS_KEY_PREFIX_ENV, default_value = DEFAULT_REDIS_KEY_PREFIX)]
    pub redis_key_prefix: String,

    #[arg(
        long,
        env = CODE_LENGTH_ENV,
        default_value_t = linkmint_generator::DEFAULT_CODE_LENGTH
    )]
    pub code_length: usize,

    #[arg(
        long,
        env = MAX_ATTEMPTS_ENV,
        default_value_t = linkmint_shortener::allocator::DEFAULT_MAX_ATTEMPTS,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub max_attempts: u32,

    /// Deadline for every link store and sink call.
    #[arg(long, env = STORE_TIMEOUT_MS_ENV, default_value_t = 2000)]
    pub store_timeout_ms: u64,

    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value_t = LogFormatArg::Pretty)]
    pub log_format: LogFormatArg,
}
