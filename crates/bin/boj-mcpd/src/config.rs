use boj_core::is_http_base;
use boj_types::schema::DEFAULT_API_BASE;
use clap::{Parser, builder::BoolishValueParser};
use std::error::Error;
use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_RETRY_DELAY_MS: u64 = 1_000;
const DEFAULT_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_TAG_CACHE_TTL_SECS: u64 = 24 * 60 * 60;
const DEFAULT_TAG_MAX_PAGES: u32 = 20;
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Parser, Debug)]
#[command(name = "boj-mcpd", version, about = "BOJ / solved.ac MCP daemon.")]
struct CliArgs {
    /// Default BOJ handle for the user statistics tools.
    #[arg(long, env = "BOJ_HANDLE")]
    handle: Option<String>,

    #[arg(long, env = "BOJ_API_BASE", default_value = DEFAULT_API_BASE)]
    api_base: String,

    #[arg(long, env = "BOJ_FETCH_MAX_RETRIES", default_value_t = DEFAULT_MAX_RETRIES)]
    max_retries: u32,

    #[arg(
        long,
        env = "BOJ_FETCH_RETRY_DELAY_MS",
        default_value_t = DEFAULT_RETRY_DELAY_MS
    )]
    retry_delay_ms: u64,

    /// Per-attempt timeout; 0 disables it.
    #[arg(long, env = "BOJ_FETCH_TIMEOUT_MS", default_value_t = DEFAULT_TIMEOUT_MS)]
    timeout_ms: u64,

    #[arg(
        long,
        env = "BOJ_TAG_CACHE_TTL_SECS",
        default_value_t = DEFAULT_TAG_CACHE_TTL_SECS
    )]
    tag_cache_ttl_secs: u64,

    #[arg(long, env = "BOJ_TAG_MAX_PAGES", default_value_t = DEFAULT_TAG_MAX_PAGES)]
    tag_max_pages: u32,

    #[arg(
        long = "stdio",
        env = "BOJ_ENABLE_STDIO",
        default_value_t = true,
        value_parser = BoolishValueParser::new()
    )]
    enable_stdio: bool,

    /// Also serve streamable HTTP on this address.
    #[arg(long, env = "BOJ_MCP_HTTP_ADDR")]
    mcp_http_addr: Option<SocketAddr>,

    /// `tracing` filter directive; `RUST_LOG` syntax.
    #[arg(long, env = "BOJ_LOG", default_value = DEFAULT_LOG_FILTER)]
    log: String,
}

/// Runtime configuration loaded from CLI arguments and environment variables.
#[derive(Debug, Clone)]
pub struct BojConfig {
    pub handle: Option<String>,
    pub api_base: String,
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub timeout: Duration,
    pub tag_cache_ttl: Duration,
    pub tag_max_pages: u32,
    pub enable_stdio: bool,
    pub mcp_http_addr: Option<SocketAddr>,
    pub log: String,
}

#[derive(Debug)]
pub enum ConfigError {
    MissingSetting(&'static str),
    InvalidSetting { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSetting(name) => write!(f, "missing required setting: {name}"),
            Self::InvalidSetting { name, value } => {
                write!(f, "invalid {name} value: {value}")
            }
        }
    }
}

impl Error for ConfigError {}

impl BojConfig {
    pub fn from_args() -> Result<Self, ConfigError> {
        let args = CliArgs::parse();
        Self::try_from(args)
    }
}

impl TryFrom<CliArgs> for BojConfig {
    type Error = ConfigError;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let handle = args
            .handle
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        let api_base = args.api_base.trim().trim_end_matches('/').to_string();
        if !is_http_base(&api_base) {
            return Err(ConfigError::InvalidSetting {
                name: "BOJ_API_BASE",
                value: args.api_base,
            });
        }

        if args.tag_max_pages == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "BOJ_TAG_MAX_PAGES",
                value: args.tag_max_pages.to_string(),
            });
        }

        if EnvFilter::try_new(&args.log).is_err() {
            return Err(ConfigError::InvalidSetting {
                name: "BOJ_LOG",
                value: args.log,
            });
        }

        if !args.enable_stdio && args.mcp_http_addr.is_none() {
            return Err(ConfigError::MissingSetting("BOJ_MCP_HTTP_ADDR"));
        }

        Ok(Self {
            handle,
            api_base,
            max_retries: args.max_retries,
            retry_delay: Duration::from_millis(args.retry_delay_ms),
            timeout: Duration::from_millis(args.timeout_ms),
            tag_cache_ttl: Duration::from_secs(args.tag_cache_ttl_secs),
            tag_max_pages: args.tag_max_pages,
            enable_stdio: args.enable_stdio,
            mcp_http_addr: args.mcp_http_addr,
            log: args.log,
        })
    }
}
