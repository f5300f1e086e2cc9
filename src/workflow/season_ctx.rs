//! 季度处理上下文
//!
//! 封装"我正在处理哪个季度、它是否已经结束"这一信息

use chrono::NaiveDate;
use std::fmt::Display;

use crate::models::season::{add_weeks, days_between, generate_season_tag, DAYS_PER_SEASON};

/// 季度处理上下文
#[derive(Debug, Clone)]
pub struct SeasonContext {
    /// 工作表名称，例如 `WINTER 2014`
    pub title: String,

    /// 季度开始日期（第 1 列投票对应的那一周）
    pub start_date: NaiveDate,

    /// 季度标签，例如 `Winter 2014`
    pub tag: String,

    /// 距开始已超过 13 周，整季已经播完
    pub finished: bool,

    /// 计算所用的"今天"
    pub today: NaiveDate,
}

impl SeasonContext {
    /// 创建新的季度上下文
    pub fn new(title: impl Into<String>, start_date: NaiveDate, today: NaiveDate) -> Self {
        let title = title.into();
        Self {
            tag: generate_season_tag(&title),
            finished: days_between(start_date, today) > DAYS_PER_SEASON,
            title,
            start_date,
            today,
        }
    }

    /// 从季度开始到今天经过的整周数
    pub fn elapsed_weeks(&self) -> i64 {
        days_between(self.start_date, self.today) / 7
    }

    /// 第 `index` 列（第 0 列是标题）对应的那一周的日期
    pub fn week_date(&self, index: usize) -> NaiveDate {
        add_weeks(self.start_date, index as i64 - 1)
    }

    /// 开始日期之后若干周的日期
    pub fn weeks_after_start(&self, weeks: i64) -> NaiveDate {
        add_weeks(self.start_date, weeks)
    }
}

impl Display for SeasonContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.title)
    }
}
