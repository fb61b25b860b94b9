// src/config.rs
use crate::domain::errors::{AppError, AppResult};
use crate::proposal::message::LinkEncoding;
use crate::session::controller::SessionSettings;
use dotenv::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Quote tool configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Kit catalog location
    pub catalog: CatalogConfig,

    /// Proposal export settings
    pub proposal: ProposalConfig,

    /// Share link settings
    pub share: ShareConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Catalog configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogConfig {
    /// Spreadsheet path (xlsx, xls or ods)
    pub path: PathBuf,

    /// Sheet name; the first sheet when absent
    pub sheet: Option<String>,
}

/// Proposal configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProposalConfig {
    /// Banner image shown on screen and in the PDF
    pub banner_path: PathBuf,

    /// Text title used when the banner cannot be placed
    pub title: String,

    /// Download file name
    pub file_name: String,

    /// Directory where exported proposals are written
    pub output_dir: PathBuf,
}

/// Share link configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShareConfig {
    /// Percent-encode every reserved character in the WhatsApp link
    pub strict_link_encoding: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level (e.g., "info", "debug", "warn", "error")
    pub level: String,

    /// Log to file
    pub to_file: bool,

    /// Log file path
    pub file_path: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let flag = |key: &str| -> AppResult<bool> {
            match lookup(key) {
                Some(value) => value.trim().parse().map_err(|_| {
                    AppError::Config(format!("{} must be true or false, got '{}'", key, value))
                }),
                None => Ok(false),
            }
        };

        let catalog_config = CatalogConfig {
            path: lookup("CATALOG_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.catalog.path),
            sheet: lookup("CATALOG_SHEET").filter(|s| !s.trim().is_empty()),
        };

        let proposal_config = ProposalConfig {
            banner_path: lookup("BANNER_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.proposal.banner_path),
            title: lookup("PROPOSAL_TITLE").unwrap_or(defaults.proposal.title),
            file_name: lookup("PROPOSAL_FILE_NAME").unwrap_or(defaults.proposal.file_name),
            output_dir: lookup("PROPOSAL_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.proposal.output_dir),
        };

        let share_config = ShareConfig {
            strict_link_encoding: flag("STRICT_LINK_ENCODING")?,
        };

        let logging_config = LoggingConfig {
            level: lookup("LOG_LEVEL").unwrap_or(defaults.logging.level),
            to_file: flag("LOG_TO_FILE")?,
            file_path: lookup("LOG_FILE_PATH"),
        };

        Ok(Config {
            catalog: catalog_config,
            proposal: proposal_config,
            share: share_config,
            logging: logging_config,
        })
    }

    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let mut file = File::open(path).map_err(|e| {
            AppError::Config(format!("Failed to open config file: {}", e))
        })?;

        let mut contents = String::new();
        file.read_to_string(&mut contents).map_err(|e| {
            AppError::Config(format!("Failed to read config file: {}", e))
        })?;

        let config: Config = serde_json::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file: {}", e))
        })?;

        Ok(config)
    }

    /// Save configuration to a file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> AppResult<()> {
        let contents = serde_json::to_string_pretty(self)?;

        std::fs::write(path, contents).map_err(|e| {
            AppError::Config(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Session settings derived from this configuration
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            link_encoding: if self.share.strict_link_encoding {
                LinkEncoding::Strict
            } else {
                LinkEncoding::Minimal
            },
            proposal_title: self.proposal.title.clone(),
            proposal_file_name: self.proposal.file_name.clone(),
        }
    }

    /// Where an exported proposal is written
    pub fn proposal_output_path(&self) -> PathBuf {
        self.proposal.output_dir.join(&self.proposal.file_name)
    }

    /// Initialize logging based on configuration
    pub fn init_logging(&self) -> AppResult<()> {
        let mut builder = env_logger::Builder::new();

        // Set log level
        let log_level = match self.logging.level.to_lowercase().as_str() {
            "trace" => log::LevelFilter::Trace,
            "debug" => log::LevelFilter::Debug,
            "info" => log::LevelFilter::Info,
            "warn" => log::LevelFilter::Warn,
            "error" => log::LevelFilter::Error,
            "off" => log::LevelFilter::Off,
            _ => log::LevelFilter::Info,
        };

        builder.filter_level(log_level);

        // Configure output
        if self.logging.to_file {
            if let Some(file_path) = &self.logging.file_path {
                let file = File::create(file_path).map_err(|e| {
                    AppError::Config(format!("Failed to create log file: {}", e))
                })?;

                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
        }

        // Initialize the logger
        builder.try_init().map_err(|e| {
            AppError::Config(format!("Failed to initialize logger: {}", e))
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig {
                path: PathBuf::from("precos.xlsx"),
                sheet: None,
            },
            proposal: ProposalConfig {
                banner_path: PathBuf::from("banner.png"),
                title: "Proposta - MCPF BAHIA".to_string(),
                file_name: "proposta_mcpf.pdf".to_string(),
                output_dir: PathBuf::from("."),
            },
            share: ShareConfig {
                strict_link_encoding: false,
            },
            logging: LoggingConfig {
                // Warnings only, so logs do not drown the interactive panel
                level: "warn".to_string(),
                to_file: false,
                file_path: None,
            },
        }
    }
}
