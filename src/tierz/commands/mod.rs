use crate::config::TierzConfig;
use crate::error::ErrorDescriptor;
use crate::model::{Item, TierRow};
use chrono::{DateTime, Utc};
use std::path::PathBuf;

pub mod config;
pub mod doctor;
pub mod export;
pub mod list;
pub mod moves;
pub mod options;
pub mod seed;

/// Where tierz keeps its documents and `config.json`.
#[derive(Debug, Clone)]
pub struct TierzPaths {
    pub data_dir: PathBuf,
}

impl TierzPaths {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    /// Full tier view, when the command shows the arrangement.
    pub rows: Vec<TierRow>,
    pub affected_items: Vec<Item>,
    /// One-based placement choices.
    pub options: Vec<usize>,
    pub last_updated: Option<DateTime<Utc>>,
    /// Rendered export text, when written to stdout.
    pub output: Option<String>,
    pub export_path: Option<PathBuf>,
    pub config: Option<TierzConfig>,
    pub error: Option<ErrorDescriptor>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_rows(mut self, rows: Vec<TierRow>) -> Self {
        self.rows = rows;
        self
    }

    pub fn with_affected_items(mut self, items: Vec<Item>) -> Self {
        self.affected_items = items;
        self
    }

    pub fn with_config(mut self, config: TierzConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(|m| m.level == MessageLevel::Error)
    }
}
