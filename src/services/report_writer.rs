//! 报告写入服务 - 业务能力层
//!
//! 只负责"把结果和错误写到 logs 目录"能力，不关心流程

use chrono::Local;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::models::{AnimePayload, RunError};

/// 报告写入服务
///
/// 每次运行写出两个文件：
/// - `results-<时间戳>.json`：待推送的变更载荷
/// - `errors-<时间戳>.json`：无法对账的行 / 季度
pub struct ReportWriter {
    logs_path: PathBuf,
    stamp: String,
}

/// 已写出的报告文件路径
#[derive(Debug, Clone)]
pub struct ReportPaths {
    pub results: PathBuf,
    pub errors: PathBuf,
}

impl ReportWriter {
    /// 创建新的报告写入服务，时间戳取当前本地时间
    pub fn new(logs_path: impl AsRef<Path>) -> Self {
        Self::with_stamp(logs_path, Local::now().format("%Y%m%d-%H%M%S").to_string())
    }

    /// 使用自定义时间戳创建
    pub fn with_stamp(logs_path: impl AsRef<Path>, stamp: impl Into<String>) -> Self {
        Self {
            logs_path: logs_path.as_ref().to_path_buf(),
            stamp: stamp.into(),
        }
    }

    /// 写入结果与错误
    pub fn write(&self, results: &[AnimePayload], errors: &[RunError]) -> AppResult<ReportPaths> {
        fs::create_dir_all(&self.logs_path)
            .map_err(|e| AppError::file_write_failed(self.logs_path.display().to_string(), e))?;

        let paths = ReportPaths {
            results: self.logs_path.join(format!("results-{}.json", self.stamp)),
            errors: self.logs_path.join(format!("errors-{}.json", self.stamp)),
        };

        write_json(&paths.results, results)?;
        write_json(&paths.errors, errors)?;

        info!(
            "📝 已写入 {} 条结果、{} 条错误到 {}",
            results.len(),
            errors.len(),
            self.logs_path.display()
        );
        Ok(paths)
    }
}

fn write_json<T: Serialize>(path: &Path, items: &[T]) -> AppResult<()> {
    debug!("写入报告: {} ({} 条)", path.display(), items.len());
    let json = serde_json::to_string_pretty(items)?;
    fs::write(path, json).map_err(|e| AppError::file_write_failed(path.display().to_string(), e))
}
