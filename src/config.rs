use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{AppError, AppResult, ConfigError};
use crate::models::{chronological, SeasonName};

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "updater.toml";

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    // --- 追番服务配置 ---
    pub mal_username: String,
    pub mal_password: String,
    pub mal_api_base_url: String,
    // --- 表格服务配置 ---
    pub sheets_api_base_url: String,
    /// 访问令牌（令牌的获取不在本程序范围内）
    pub sheets_access_token: String,
    pub spreadsheet_id: String,
    /// 需要处理的季度工作表，顺序无关，运行时按时间排序；
    /// 为空时从投票表的工作表列表中自动发现
    pub seasons: Vec<String>,
    /// 每个季度工作表中投票行所在的范围
    pub season_rows_range: String,
    /// 每个季度工作表中开始日期所在的单元格
    pub season_start_cell: String,
    // --- 运行配置 ---
    /// 结果与错误报告输出目录
    pub logs_path: String,
    /// 只计算不推送
    pub dry_run: bool,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// HTTP 请求超时（秒）
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mal_username: "FridayFellows".to_string(),
            mal_password: String::new(),
            mal_api_base_url: "https://myanimelist.net/api".to_string(),
            sheets_api_base_url: "https://sheets.googleapis.com/v4".to_string(),
            sheets_access_token: String::new(),
            spreadsheet_id: "1uKWMRmtN5R0Lf3iNMVmwenZCNeDntGRK7is6Jl8wi6M".to_string(),
            seasons: Vec::new(),
            season_rows_range: "A2:K30".to_string(),
            season_start_cell: "A1".to_string(),
            logs_path: "logs/".to_string(),
            dry_run: false,
            verbose_logging: false,
            request_timeout_secs: 30,
        }
    }
}

impl Config {
    /// 默认值 + 环境变量
    pub fn from_env() -> AppResult<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// 配置文件（可选）+ 环境变量
    ///
    /// 配置文件路径取自 `UPDATER_CONFIG`，默认 `updater.toml`，不存在时跳过。
    pub fn load() -> AppResult<Self> {
        let path =
            std::env::var("UPDATER_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let mut config = if Path::new(&path).exists() {
            debug!("读取配置文件: {}", path);
            Self::from_file(&path)?
        } else {
            debug!("配置文件 {} 不存在，使用默认配置", path);
            Self::default()
        };

        config.apply_env()?;
        Ok(config)
    }

    /// 从 TOML 文件读取，缺失的字段使用默认值
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| AppError::file_read_failed(path, e))?;
        Self::from_toml_str(&content).map_err(|e| AppError::toml_parse_failed(path, e))
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// 用环境变量覆盖当前配置
    pub fn apply_env(&mut self) -> AppResult<()> {
        override_string("MAL_USERNAME", &mut self.mal_username);
        override_string("MAL_PASSWORD", &mut self.mal_password);
        override_string("MAL_API_BASE_URL", &mut self.mal_api_base_url);
        override_string("SHEETS_API_BASE_URL", &mut self.sheets_api_base_url);
        override_string("SHEETS_ACCESS_TOKEN", &mut self.sheets_access_token);
        override_string("SPREADSHEET_ID", &mut self.spreadsheet_id);
        override_string("SEASON_ROWS_RANGE", &mut self.season_rows_range);
        override_string("SEASON_START_CELL", &mut self.season_start_cell);
        override_string("LOGS_PATH", &mut self.logs_path);

        if let Ok(value) = std::env::var("SEASONS") {
            self.seasons = split_seasons(&value);
        }

        override_parsed("DRY_RUN", "bool", &mut self.dry_run)?;
        override_parsed("VERBOSE_LOGGING", "bool", &mut self.verbose_logging)?;
        override_parsed("REQUEST_TIMEOUT_SECS", "u64", &mut self.request_timeout_secs)?;
        Ok(())
    }

    /// 解析并按时间顺序排列配置的季度（最早的在前）
    ///
    /// 未配置任何季度时返回空列表，由调用方自动发现。
    pub fn ordered_seasons(&self) -> AppResult<Vec<SeasonName>> {
        let seasons = self
            .seasons
            .iter()
            .map(|name| {
                SeasonName::parse(name).ok_or_else(|| ConfigError::InvalidSeasonName {
                    name: name.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let before = seasons.len();
        let seasons = chronological(seasons);
        if seasons.len() != before {
            warn!("配置中存在重复的季度，已去重");
        }
        Ok(seasons)
    }
}

fn split_seasons(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn override_string(var_name: &str, target: &mut String) {
    if let Ok(value) = std::env::var(var_name) {
        *target = value;
    }
}

fn override_parsed<T: std::str::FromStr>(
    var_name: &str,
    expected_type: &str,
    target: &mut T,
) -> AppResult<()> {
    if let Ok(value) = std::env::var(var_name) {
        *target = value.trim().parse().map_err(|_| ConfigError::EnvVarParseFailed {
            var_name: var_name.to_string(),
            value: value.clone(),
            expected_type: expected_type.to_string(),
        })?;
    }
    Ok(())
}
