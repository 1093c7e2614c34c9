use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use thiserror::Error;

use threadview_core::types::depth::MaxDepth;
use threadview_infra::reddit::client::DEFAULT_BASE_URL;

const DEFAULT_USER_AGENT: &str = "threadview/0.1 (comment reader)";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http_addr: SocketAddr,
    pub api_base_url: String,
    pub user_agent: String,
    pub request_timeout: Duration,
    pub page_limit: u32,
    pub max_comment_depth: MaxDepth,
    pub cache_capacity: usize,
    pub cache_ttl: Duration,
    pub cache_sweep_interval: Duration,
    pub cors_allow_origins: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid socket address: {0}")]
    InvalidSocket(String),
    #[error("invalid integer for {0}: {1}")]
    InvalidNumber(&'static str, String),
    #[error("invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let http_addr_raw = read_string("THREADVIEW_HTTP_ADDR", "127.0.0.1:8080");
        let http_addr = http_addr_raw
            .parse()
            .map_err(|_| ConfigError::InvalidSocket(http_addr_raw.clone()))?;
        let api_base_url = read_string("THREADVIEW_API_BASE_URL", DEFAULT_BASE_URL);
        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue(
                "THREADVIEW_API_BASE_URL",
                api_base_url,
            ));
        }
        let user_agent = read_string("THREADVIEW_USER_AGENT", DEFAULT_USER_AGENT);
        let request_timeout_secs = read_u64("THREADVIEW_REQUEST_TIMEOUT_SECS", 15)?;
        let page_limit = read_u32("THREADVIEW_PAGE_LIMIT", 100)?;
        if page_limit == 0 {
            return Err(ConfigError::InvalidValue(
                "THREADVIEW_PAGE_LIMIT",
                page_limit.to_string(),
            ));
        }
        let max_depth_raw = read_usize("THREADVIEW_MAX_COMMENT_DEPTH", MaxDepth::default().get())?;
        let max_comment_depth = MaxDepth::try_from(max_depth_raw).map_err(|err| {
            ConfigError::InvalidValue("THREADVIEW_MAX_COMMENT_DEPTH", err.to_string())
        })?;
        let cache_capacity = read_usize("THREADVIEW_CACHE_CAPACITY", 256)?;
        let cache_ttl_secs = read_u64("THREADVIEW_CACHE_TTL_SECS", 300)?;
        let cache_sweep_secs = read_u64("THREADVIEW_CACHE_SWEEP_SECS", 60)?;
        let cors_allow_origins = read_list("THREADVIEW_CORS_ALLOW_ORIGINS");

        Ok(Self {
            http_addr,
            api_base_url,
            user_agent,
            request_timeout: Duration::from_secs(request_timeout_secs),
            page_limit,
            max_comment_depth,
            cache_capacity,
            cache_ttl: Duration::from_secs(cache_ttl_secs),
            cache_sweep_interval: Duration::from_secs(cache_sweep_secs),
            cors_allow_origins,
        })
    }
}

#[cfg(test)]
impl AppConfig {
    pub fn for_tests() -> Self {
        Self {
            http_addr: "127.0.0.1:0".parse().expect("static socket address"),
            api_base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: Duration::from_secs(5),
            page_limit: 25,
            max_comment_depth: MaxDepth::default(),
            cache_capacity: 16,
            cache_ttl: Duration::from_secs(60),
            cache_sweep_interval: Duration::from_secs(60),
            cors_allow_origins: Vec::new(),
        }
    }
}

pub fn load_dotenv() -> Result<(), std::io::Error> {
    let path = Path::new(".env");
    if !path.exists() {
        return Ok(());
    }
    let contents = std::fs::read_to_string(path)?;
    for (key, value) in contents.lines().filter_map(parse_dotenv_line) {
        if std::env::var_os(&key).is_some() {
            continue;
        }
        // Safety: called from main before the runtime spawns any tasks.
        unsafe {
            std::env::set_var(key, value);
        }
    }
    Ok(())
}

fn read_string(key: &'static str, default: &'static str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn read_u64(key: &'static str, default: u64) -> Result<u64, ConfigError> {
    let raw = std::env::var(key).unwrap_or_else(|_| default.to_string());
    raw.parse()
        .map_err(|_| ConfigError::InvalidNumber(key, raw))
}

fn read_usize(key: &'static str, default: usize) -> Result<usize, ConfigError> {
    let raw = std::env::var(key).unwrap_or_else(|_| default.to_string());
    raw.parse()
        .map_err(|_| ConfigError::InvalidNumber(key, raw))
}

fn read_u32(key: &'static str, default: u32) -> Result<u32, ConfigError> {
    let raw = std::env::var(key).unwrap_or_else(|_| default.to_string());
    raw.parse()
        .map_err(|_| ConfigError::InvalidNumber(key, raw))
}

fn read_list(key: &'static str) -> Vec<String> {
    parse_list(&std::env::var(key).unwrap_or_default())
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_dotenv_line(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let line = line.strip_prefix("export ").unwrap_or(line);
    let (key, raw) = line.split_once('=')?;
    let key = key.trim();
    if key.is_empty() || key.contains(char::is_whitespace) {
        return None;
    }
    Some((key.to_string(), dotenv_value(raw.trim())))
}

fn dotenv_value(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(quote @ ('"' | '\'')) if raw.len() >= 2 && raw.ends_with(quote) => {
            let inner = &raw[1..raw.len() - 1];
            if quote == '"' {
                unescape(inner)
            } else {
                inner.to_string()
            }
        }
        _ => match raw.find(" #") {
            Some(idx) => raw[..idx].trim_end().to_string(),
            None => raw.to_string(),
        },
    }
}

fn unescape(inner: &str) -> String {
    let mut output = String::with_capacity(inner.len());
    let mut escaped = false;
    for ch in inner.chars() {
        if escaped {
            output.push(match ch {
                'n' => '\n',
                'r' => '\r',
                't' => '\t',
                other => other,
            });
            escaped = false;
        } else if ch == '\\' {
            escaped = true;
        } else {
            output.push(ch);
        }
    }
    if escaped {
        output.push('\\');
    }
    output
}

#[cfg(test)]
mod tests {
    use super::{parse_dotenv_line, parse_list};

    fn entry(line: &str) -> (String, String) {
        parse_dotenv_line(line).unwrap()
    }

    #[test]
    fn parse_list_trims_and_skips_blanks() {
        assert_eq!(
            parse_list(" https://a.example , ,https://b.example"),
            vec!["https://a.example", "https://b.example"]
        );
        assert!(parse_list("").is_empty());
    }

    #[test]
    fn dotenv_plain_and_export() {
        assert_eq!(entry("THREADVIEW_PAGE_LIMIT=50"), ("THREADVIEW_PAGE_LIMIT".into(), "50".into()));
        assert_eq!(entry("export A = b"), ("A".into(), "b".into()));
    }

    #[test]
    fn dotenv_quotes() {
        assert_eq!(entry(r#"UA="threadview bot""#).1, "threadview bot");
        assert_eq!(entry("UA='raw \\n'").1, "raw \\n");
        assert_eq!(entry(r#"MSG="line\n\"quoted\"""#).1, "line\n\"quoted\"");
    }

    #[test]
    fn dotenv_inline_comment_only_when_unquoted() {
        assert_eq!(entry("A=1 # one").1, "1");
        assert_eq!(entry(r#"A="1 # one""#).1, "1 # one");
    }

    #[test]
    fn dotenv_skips_comments_and_junk() {
        assert!(parse_dotenv_line("# comment").is_none());
        assert!(parse_dotenv_line("   ").is_none());
        assert!(parse_dotenv_line("no equals sign").is_none());
        assert!(parse_dotenv_line("=value").is_none());
    }
}
