use crate::core::planner::{DEFAULT_DISCARD_TAG, DEFAULT_MAX_ORDER_SIZE};
use crate::core::ConfigProvider;
use crate::utils::error::{DiffError, Result};
use crate::utils::validation::{
    validate_file_name, validate_non_empty_string, validate_path, validate_positive_number,
    Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub paths: PathsConfig,
    pub planner: PlannerConfig,
    pub order: OrderConfig,
    /// 只由命令列設定
    #[serde(skip)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub decklists: String,
    pub output: String,
    pub topoff_file: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            decklists: "decklists".to_string(),
            output: "diff".to_string(),
            topoff_file: "topoff.txt".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub discard_tag: String,
    /// 0 表示不檢查牌組張數
    pub expected_deck_size: u32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            discard_tag: DEFAULT_DISCARD_TAG.to_string(),
            expected_deck_size: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderConfig {
    pub max_order_size: u32,
    pub enforce_cap: bool,
}

impl Default for OrderConfig {
    fn default() -> Self {
        Self {
            max_order_size: DEFAULT_MAX_ORDER_SIZE,
            enforce_cap: false,
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DiffError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| DiffError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DECKLIST_DIR})，找不到的變數保留原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_RE
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    #[cfg(feature = "cli")]
    pub fn apply_overrides(&mut self, cli: &crate::config::CliConfig) {
        if let Some(decklists) = &cli.decklists {
            self.paths.decklists = decklists.clone();
        }
        if let Some(output) = &cli.output {
            self.paths.output = output.clone();
        }
        if let Some(max_order_size) = cli.max_order_size {
            self.order.max_order_size = max_order_size;
        }
        if cli.enforce_order_cap {
            self.order.enforce_cap = true;
        }
        self.dry_run = cli.dry_run;
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_path("paths.decklists", &self.paths.decklists)?;
        validate_path("paths.output", &self.paths.output)?;
        validate_file_name("paths.topoff_file", &self.paths.topoff_file)?;
        validate_non_empty_string("planner.discard_tag", &self.planner.discard_tag)?;
        validate_positive_number("order.max_order_size", self.order.max_order_size, 1)?;
        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn decklist_path(&self) -> &str {
        &self.paths.decklists
    }

    fn output_path(&self) -> &str {
        &self.paths.output
    }

    fn topoff_file(&self) -> &str {
        &self.paths.topoff_file
    }

    fn discard_tag(&self) -> &str {
        &self.planner.discard_tag
    }

    fn expected_deck_size(&self) -> u32 {
        self.planner.expected_deck_size
    }

    fn max_order_size(&self) -> Option<u32> {
        Some(self.order.max_order_size)
    }

    fn enforce_order_cap(&self) -> bool {
        self.order.enforce_cap
    }

    fn dry_run(&self) -> bool {
        self.dry_run
    }
}
