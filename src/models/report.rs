use serde::{Deserialize, Serialize};

use crate::error::ReconcileError;

/// 一条无法对账的记录，写入 errors 报告
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunError {
    /// 季度工作表名称
    pub season: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// 投票行的序号（从 1 开始）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
    /// 无法解析的开始日期原文
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub reason: String,
}

impl RunError {
    /// 行级错误
    pub fn for_row(season: &str, title: &str, row: usize, err: &ReconcileError) -> Self {
        Self {
            season: season.to_string(),
            title: Some(title.to_string()),
            row: Some(row),
            date: None,
            reason: err.to_string(),
        }
    }

    /// 季度级错误（开始日期无效）
    pub fn for_season(season: &str, date: &str, err: &ReconcileError) -> Self {
        Self {
            season: season.to_string(),
            title: None,
            row: None,
            date: Some(date.to_string()),
            reason: err.to_string(),
        }
    }
}

/// 单个季度的处理统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeasonStats {
    /// 读到的行数（不含空标题行）
    pub rows_seen: usize,
    /// 产生变更的行数
    pub updates: usize,
    /// 与记录一致、无需推送的行数
    pub unchanged: usize,
    pub errors: usize,
}

/// 整次运行的统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub seasons_processed: usize,
    pub seasons_skipped: usize,
    pub rows_seen: usize,
    pub updates: usize,
    pub unchanged: usize,
    pub errors: usize,
}

impl RunSummary {
    /// 累加一个已处理季度的统计
    pub fn record_season(&mut self, stats: &SeasonStats) {
        self.seasons_processed += 1;
        self.rows_seen += stats.rows_seen;
        self.updates += stats.updates;
        self.unchanged += stats.unchanged;
        self.errors += stats.errors;
    }

    /// 记录一个被跳过的季度（算作一条错误）
    pub fn record_skipped_season(&mut self) {
        self.seasons_skipped += 1;
        self.errors += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_error_serialization_omits_date() {
        let err = ReconcileError::UnresolvedTitle {
            title: "Gegege no Kitaro (2018)".to_string(),
        };
        let entry = RunError::for_row("FALL 2018", "Gegege no Kitaro (2018)", 4, &err);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["season"], "FALL 2018");
        assert_eq!(json["row"], 4);
        assert!(json.get("date").is_none());
    }

    #[test]
    fn test_season_error_keeps_raw_date() {
        let err = ReconcileError::MalformedStartDate {
            raw: "soon".to_string(),
        };
        let entry = RunError::for_season("SPRING 2014", "soon", &err);
        assert_eq!(entry.date.as_deref(), Some("soon"));
        assert!(entry.title.is_none());
    }

    #[test]
    fn test_run_summary_accumulates_seasons() {
        let mut summary = RunSummary::default();
        summary.record_season(&SeasonStats {
            rows_seen: 10,
            updates: 4,
            unchanged: 5,
            errors: 1,
        });
        summary.record_skipped_season();

        assert_eq!(summary.seasons_processed, 1);
        assert_eq!(summary.seasons_skipped, 1);
        assert_eq!(summary.rows_seen, 10);
        assert_eq!(summary.errors, 2);
    }
}
