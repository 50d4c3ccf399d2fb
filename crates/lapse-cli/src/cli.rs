use clap::{Parser, ValueEnum};
use std::fmt::{Display, Formatter};

pub const BASE_URL_ENV: &str = "LAPSE_BASE_URL";
pub const TTL_ENV: &str = "LAPSE_TTL_SECS";
pub const SWEEP_INTERVAL_ENV: &str = "LAPSE_SWEEP_INTERVAL_SECS";
pub const ID_WIDTH_ENV: &str = "LAPSE_ID_WIDTH";
pub const OWNER_ENV: &str = "LAPSE_OWNER";
pub const LOG_FORMAT_ENV: &str = "LAPSE_LOG_FORMAT";

pub const DEFAULT_BASE_URL: &str = "http://clck.ru/";
pub const DEFAULT_TTL_SECS: &str = "15";
pub const DEFAULT_SWEEP_INTERVAL_SECS: &str = "5";
pub const DEFAULT_ID_WIDTH: &str = "6";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[value(name = "text")]
    Text,
    #[value(name = "json")]
    Json,
}

impl Display for LogFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Text => write!(f, "text"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

/// Interactive shell for creating and following expiring short links.
#[derive(Debug, Parser)]
#[command(name = "lapse", version)]
pub struct CLI {
    /// Prefix rendered in front of every link id.
    #[arg(long, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Lifetime of new links, in seconds.
    #[arg(
        long = "ttl",
        env = TTL_ENV,
        default_value = DEFAULT_TTL_SECS,
        value_parser = clap::value_parser!(u64).range(1..),
    )]
    pub ttl_secs: u64,

    /// Seconds between background sweeps of expired links.
    #[arg(
        long = "sweep-interval",
        env = SWEEP_INTERVAL_ENV,
        default_value = DEFAULT_SWEEP_INTERVAL_SECS,
        value_parser = clap::value_parser!(u64).range(1..),
    )]
    pub sweep_interval_secs: u64,

    /// Number of characters in generated link ids.
    #[arg(long, env = ID_WIDTH_ENV, default_value = DEFAULT_ID_WIDTH)]
    pub id_width: usize,

    /// Identity that owns the links created in this session. A random
    /// UUID is used when absent.
    #[arg(long, env = OWNER_ENV)]
    pub owner: Option<String>,

    #[arg(
        long,
        env = LOG_FORMAT_ENV,
        value_enum,
        default_value_t = LogFormat::Text
    )]
    pub log_format: LogFormat,
}
