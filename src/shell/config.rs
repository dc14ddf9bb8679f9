use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::modules::archiving::adapters::outbound::cron_archiver::CronArchiverSettings;
use crate::modules::archiving::core::archive_request::{RequestError, parse_site_ids};
use crate::shared::core::primitives::{AccessToken, SiteId};
use crate::shared::infrastructure::logging::line_formatter::DEFAULT_LOG_FORMAT;
use crate::shared::infrastructure::logging::settings::{
    LogSettings, LogSettingsError, parse_log_writers, resolve_log_file_path, resolve_log_level,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a boolean, got {value:?}")]
    InvalidBool { name: &'static str, value: String },

    #[error("{name} must be a non-negative integer, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },

    #[error("ARCHIVE_SUPER_USER_TOKENS contains a malformed token")]
    InvalidToken,

    #[error("ARCHIVE_HTTP_LISTEN is not a socket address: {0:?}")]
    InvalidListen(String),

    #[error("ARCHIVE_SITES: {0}")]
    InvalidSites(#[source] RequestError),

    #[error(transparent)]
    Log(#[from] LogSettingsError),
}

/// Front controller toggles set before archiving starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BootstrapFlags {
    pub dispatch: bool,
    pub error_handler: bool,
    pub session_start: bool,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub install_dir: PathBuf,
    pub tmp_dir: PathBuf,
    pub http_listen: Option<SocketAddr>,
    pub console_enabled: bool,
    pub super_user_tokens: Vec<AccessToken>,
    pub sites: Vec<SiteId>,
    pub archiver: CronArchiverSettings,
    pub log: LogSettings,
    pub bootstrap: BootstrapFlags,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let install_dir = var("ARCHIVE_INSTALL_DIR")
            .map(PathBuf::from)
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));
        let tmp_dir = var("ARCHIVE_TMP_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| install_dir.join("tmp"));

        let http_listen = var("ARCHIVE_HTTP_LISTEN")
            .map(|raw| {
                raw.trim()
                    .parse::<SocketAddr>()
                    .map_err(|_| ConfigError::InvalidListen(raw))
            })
            .transpose()?;

        let super_user_tokens = var("ARCHIVE_SUPER_USER_TOKENS")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|t| {
                let token = AccessToken::new(t);
                token
                    .is_well_formed()
                    .then_some(token)
                    .ok_or(ConfigError::InvalidToken)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let sites = parse_site_ids(&var("ARCHIVE_SITES").unwrap_or_else(|| "1".to_string()))
            .map_err(ConfigError::InvalidSites)?;

        let archiver = CronArchiverSettings {
            max_attempts: number(&var, "ARCHIVE_MAX_ATTEMPTS", 3u32)?,
            retry_delay: Duration::from_millis(number(&var, "ARCHIVE_RETRY_DELAY_MS", 1000u64)?),
        };

        let strict = flag(&var, "ARCHIVE_LOG_WRITERS_STRICT", false)?;
        let log = LogSettings {
            writers: parse_log_writers(
                &var("ARCHIVE_LOG_WRITERS").unwrap_or_else(|| "screen".to_string()),
                strict,
            )?,
            level: resolve_log_level(&var("ARCHIVE_LOG_LEVEL").unwrap_or_default()),
            file_path: resolve_log_file_path(
                &var("ARCHIVE_LOG_FILE_PATH").unwrap_or_default(),
                &tmp_dir,
            ),
            format: var("ARCHIVE_LOG_FORMAT").unwrap_or_else(|| DEFAULT_LOG_FORMAT.to_string()),
        };

        let bootstrap = BootstrapFlags {
            dispatch: flag(&var, "ARCHIVE_ENABLE_DISPATCH", false)?,
            error_handler: flag(&var, "ARCHIVE_ENABLE_ERROR_HANDLER", false)?,
            session_start: flag(&var, "ARCHIVE_ENABLE_SESSION_START", false)?,
        };

        Ok(Self {
            install_dir,
            tmp_dir,
            http_listen,
            console_enabled: flag(&var, "ARCHIVE_CONSOLE_ENABLED", true)?,
            super_user_tokens,
            sites,
            archiver,
            log,
            bootstrap,
        })
    }
}

fn flag(
    var: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: bool,
) -> Result<bool, ConfigError> {
    let Some(value) = var(name) else {
        return Ok(default);
    };
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool { name, value }),
    }
}

fn number<T: FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match var(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
    }
}
