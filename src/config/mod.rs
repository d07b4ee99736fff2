pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::config::toml_config::TomlConfig;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Serialize, Deserialize, Parser)]
#[command(name = "deck-diff")]
#[command(about = "Plans card moves between decks, the collection and new orders")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Directory holding the exported decklists
    #[arg(long)]
    pub decklists: Option<String>,

    /// Directory the plan is written to
    #[arg(long)]
    pub output: Option<String>,

    /// Maximum number of cards in one order
    #[arg(long)]
    pub max_order_size: Option<u32>,

    /// Fail instead of warning when the order exceeds the maximum order size
    #[arg(long)]
    pub enforce_order_cap: bool,

    /// Compute and log the plan without writing any files
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 載入設定檔（若有指定）並套用命令列覆蓋
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                TomlConfig::from_file(path)?
            }
            None => TomlConfig::default(),
        };
        config.apply_overrides(self);
        Ok(config)
    }
}
