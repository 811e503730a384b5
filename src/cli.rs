//! Command-line interface for mcp-gateway.
//!
//! Uses lexopt for a small, dependency-free parser.

use std::ffi::OsString;
use std::net::IpAddr;
use std::path::PathBuf;

/// Command-line arguments.
///
/// Every override is optional; unset values fall through to the
/// environment, the config file, and finally the defaults.
#[derive(Debug, Clone, Default)]
pub struct Args {
    /// Host address to bind to.
    pub host: Option<IpAddr>,
    /// Port to listen on.
    pub port: Option<u16>,
    /// Path to configuration file.
    pub config: Option<PathBuf>,
    /// Log level or filter directive.
    pub log_level: Option<String>,
    /// GitHub REST API base URL.
    pub github_api_url: Option<String>,
    /// Provider call timeout in seconds.
    pub provider_timeout: Option<u64>,
    /// Idle session lifetime in seconds (0 disables expiry).
    pub session_ttl: Option<u64>,
    /// Show version and exit.
    pub version: bool,
    /// Show help and exit.
    pub help: bool,
}

/// Parse command-line arguments.
pub fn parse_args() -> Result<Args, ArgsError> {
    parse_args_from(std::env::args_os())
}

/// Parse arguments from an iterator (for testing).
pub fn parse_args_from<I>(args: I) -> Result<Args, ArgsError>
where
    I: IntoIterator<Item = OsString>,
{
    use lexopt::prelude::*;

    let mut result = Args::default();
    let mut parser = lexopt::Parser::from_iter(args);

    while let Some(arg) = parser.next()? {
        match arg {
            Short('h') | Long("help") => {
                result.help = true;
            }
            Short('V') | Long("version") => {
                result.version = true;
            }
            Short('H') | Long("host") => {
                let value: String = parser.value()?.parse()?;
                result.host = Some(
                    value
                        .parse()
                        .map_err(|_| ArgsError::InvalidValue("host", value))?,
                );
            }
            Short('p') | Long("port") => {
                result.port = Some(parse_number(&mut parser, "port")?);
            }
            Short('c') | Long("config") => {
                result.config = Some(parser.value()?.parse()?);
            }
            Short('l') | Long("log-level") => {
                result.log_level = Some(parser.value()?.parse()?);
            }
            Long("github-api-url") => {
                result.github_api_url = Some(parser.value()?.parse()?);
            }
            Long("provider-timeout") => {
                let secs: u64 = parse_number(&mut parser, "provider-timeout")?;
                if secs == 0 {
                    return Err(ArgsError::InvalidValue("provider-timeout", secs.to_string()));
                }
                result.provider_timeout = Some(secs);
            }
            Long("session-ttl") => {
                result.session_ttl = Some(parse_number(&mut parser, "session-ttl")?);
            }
            Value(val) => {
                return Err(ArgsError::UnexpectedArgument(val.to_string_lossy().into()));
            }
            _ => return Err(arg.unexpected().into()),
        }
    }

    Ok(result)
}

fn parse_number<T: std::str::FromStr>(
    parser: &mut lexopt::Parser,
    name: &'static str,
) -> Result<T, ArgsError> {
    use lexopt::prelude::*;

    let value: String = parser.value()?.parse()?;
    value
        .parse()
        .map_err(|_| ArgsError::InvalidValue(name, value))
}

/// Print help message.
pub fn print_help() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        r#"mcp-gateway {version}
Session-oriented HTTP gateway for GitHub commands

USAGE:
    mcp-gateway [OPTIONS]

OPTIONS:
    -H, --host <ADDR>              Host address to bind [default: 127.0.0.1]
    -p, --port <PORT>              Port to listen on [default: 3000]
    -c, --config <FILE>            Path to configuration file (JSON)
    -l, --log-level <LVL>          Log level (error, warn, info, debug, trace)
        --github-api-url <URL>     GitHub API base URL [default: https://api.github.com]
        --provider-timeout <SECS>  Timeout for each GitHub call [default: 30]
        --session-ttl <SECS>       Expire sessions idle this long, 0 to disable [default: 3600]
    -h, --help                     Print help
    -V, --version                  Print version

ENVIRONMENT VARIABLES:
    MCP_GATEWAY_HOST              Host address (overrides config)
    MCP_GATEWAY_PORT              Port number (overrides config)
    PORT                          Port number, if MCP_GATEWAY_PORT is unset
    MCP_GATEWAY_GITHUB_API_URL    GitHub API base URL (overrides config)
    MCP_GATEWAY_PROVIDER_TIMEOUT  Provider timeout in seconds (overrides config)
    MCP_GATEWAY_SESSION_TTL       Idle session lifetime in seconds (overrides config)
    MCP_GATEWAY_LOG_LEVEL         Log level (overrides config)
    RUST_LOG                      Alternative log level setting

EXAMPLES:
    # Start with defaults (localhost:3000)
    mcp-gateway

    # Listen on all interfaces, keep idle sessions for ten minutes
    mcp-gateway -H 0.0.0.0 -p 8080 --session-ttl 600

    # Point at a GitHub Enterprise instance
    mcp-gateway --github-api-url https://github.example.com/api/v3

    # Start with config file
    mcp-gateway -c /etc/mcp-gateway/config.json
"#
    );
}

/// Print version.
pub fn print_version() {
    println!("mcp-gateway {}", env!("CARGO_PKG_VERSION"));
}

/// Argument parsing errors.
#[derive(Debug)]
pub enum ArgsError {
    /// Lexopt parsing error.
    Lexopt(lexopt::Error),
    /// Invalid argument value.
    InvalidValue(&'static str, String),
    /// Unexpected positional argument.
    UnexpectedArgument(String),
}

impl std::fmt::Display for ArgsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lexopt(e) => write!(f, "{}", e),
            Self::InvalidValue(name, value) => {
                write!(f, "invalid value for --{}: '{}'", name, value)
            }
            Self::UnexpectedArgument(arg) => {
                write!(f, "unexpected argument: '{}'", arg)
            }
        }
    }
}

impl std::error::Error for ArgsError {}

impl From<lexopt::Error> for ArgsError {
    fn from(e: lexopt::Error) -> Self {
        Self::Lexopt(e)
    }
}
