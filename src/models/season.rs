//! 季度名称与日期工具

use chrono::{Duration, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

/// 一个季度的周数
pub const WEEKS_PER_SEASON: u32 = 13;

/// 一个季度的天数（13 周）
pub const DAYS_PER_SEASON: i64 = 7 * WEEKS_PER_SEASON as i64;

/// 季度枚举，按一年内的先后排序
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Season {
    /// 冬季（1 月）
    Winter,
    /// 春季（4 月）
    Spring,
    /// 夏季（7 月）
    Summer,
    /// 秋季（10 月）
    Fall,
}

impl Season {
    /// 从名称解析季度（忽略大小写）
    pub fn from_str(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "WINTER" => Some(Season::Winter),
            "SPRING" => Some(Season::Spring),
            "SUMMER" => Some(Season::Summer),
            "FALL" => Some(Season::Fall),
            _ => None,
        }
    }
}

/// 投票表中一个季度工作表的名称，例如 `WINTER 2014`
///
/// 相等、哈希与排序都只看 `(year, season)`，`FALL 2013` 与 `Fall 2013` 是同一个季度。
#[derive(Debug, Clone)]
pub struct SeasonName {
    /// 工作表原始名称
    pub raw: String,
    pub season: Season,
    pub year: i32,
}

fn season_name_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^\s*(WINTER|SPRING|SUMMER|FALL)\s+(\d{4})\s*$").ok())
        .as_ref()
}

impl SeasonName {
    /// 解析工作表名称，无法识别时返回 `None`
    pub fn parse(raw: &str) -> Option<Self> {
        let caps = season_name_regex()?.captures(raw)?;
        let season = Season::from_str(caps.get(1)?.as_str())?;
        let year = caps.get(2)?.as_str().parse().ok()?;
        Some(Self {
            raw: raw.trim().to_string(),
            season,
            year,
        })
    }

    fn key(&self) -> (i32, Season) {
        (self.year, self.season)
    }
}

/// 按时间顺序排列（最早的在前）并去掉重复的季度
pub fn chronological(seasons: impl IntoIterator<Item = SeasonName>) -> Vec<SeasonName> {
    let mut seasons: Vec<SeasonName> = seasons.into_iter().collect();
    seasons.sort();
    seasons.dedup();
    seasons
}

impl PartialEq for SeasonName {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for SeasonName {}

impl Hash for SeasonName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl Ord for SeasonName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl PartialOrd for SeasonName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for SeasonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// 由季度名称生成标签：每个单词首字母大写，其余小写
///
/// `SPRING 2014` → `Spring 2014`
pub fn generate_season_tag(season: &str) -> String {
    season
        .to_lowercase()
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// 格式化为 `YYYY-MM-DD`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// 两个日期之间相差的整天数（可为负）
pub fn days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    end.signed_duration_since(start).num_days()
}

/// 在日期上加若干周
pub fn add_weeks(date: NaiveDate, weeks: i64) -> NaiveDate {
    date + Duration::days(7 * weeks)
}

/// 解析表格中的季度开始日期
///
/// 支持 `2014-01-10`、`1/10/2014` 和 `2014/01/10` 三种写法
pub fn parse_sheet_date(raw: &str) -> Option<NaiveDate> {
    let value = raw.trim();
    ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}

/// 解析追番服务的日期字段，`""` 与 `0000-00-00` 视为未设置
pub fn parse_service_date(raw: &str) -> Option<NaiveDate> {
    let value = raw.trim();
    if value.is_empty() || value == "0000-00-00" {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}
