//! 追番服务记录
//!
//! 追番服务返回的字段全部是字符串，这里是唯一的转换边界：
//! 原始结构 → [`TrackingRecord`]，转换时校验一次，之后不再重复解析。

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::models::payload::AnimePayload;
use crate::models::season::parse_service_date;

/// 观看状态（数值与追番服务一致）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WatchStatus {
    Watching = 1,
    Completed = 2,
    OnHold = 3,
    Dropped = 4,
    PlanToWatch = 6,
}

impl WatchStatus {
    /// 获取状态代码
    pub fn code(self) -> u8 {
        self as u8
    }

    /// 从代码解析状态
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(WatchStatus::Watching),
            2 => Some(WatchStatus::Completed),
            3 => Some(WatchStatus::OnHold),
            4 => Some(WatchStatus::Dropped),
            6 => Some(WatchStatus::PlanToWatch),
            _ => None,
        }
    }
}

impl fmt::Display for WatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WatchStatus::Watching => "WATCHING",
            WatchStatus::Completed => "COMPLETED",
            WatchStatus::OnHold => "ONHOLD",
            WatchStatus::Dropped => "DROPPED",
            WatchStatus::PlanToWatch => "PLANTOWATCH",
        };
        f.write_str(name)
    }
}

impl Serialize for WatchStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for WatchStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = u8::deserialize(deserializer)?;
        WatchStatus::from_code(code)
            .ok_or_else(|| serde::de::Error::custom(format!("未知的观看状态: {}", code)))
    }
}

/// 追番服务中的一条番剧记录（规范化后）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingRecord {
    pub id: u32,
    pub title: String,
    /// 总集数，未知时为 `None`
    pub total_episodes: Option<u32>,
    pub watched_episodes: Option<u32>,
    pub status: Option<WatchStatus>,
    pub score: Option<u32>,
    pub start_date: Option<NaiveDate>,
    pub finish_date: Option<NaiveDate>,
    /// 逗号分隔的标签文本
    pub tags: String,
    /// 列表中还没有这部番，需要新增而不是更新
    pub is_new: bool,
}

/// 用户列表接口返回的原始条目
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawListEntry {
    pub series_animedb_id: String,
    pub series_title: String,
    pub series_synonyms: String,
    pub series_episodes: String,
    pub series_status: String,
    pub series_start: String,
    pub series_end: String,
    pub series_image: String,
    pub my_id: String,
    pub my_watched_episodes: String,
    pub my_start_date: String,
    pub my_finish_date: String,
    pub my_score: String,
    pub my_status: String,
    pub my_rewatching_ep: String,
    pub my_last_updated: String,
    pub my_tags: String,
}

/// 按标题搜索接口返回的原始条目
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSeriesInfo {
    pub id: String,
    pub title: String,
    pub english: String,
    pub synonyms: String,
    pub episodes: String,
    pub score: String,
    #[serde(rename = "type")]
    pub series_type: String,
    pub status: String,
    pub start_date: String,
    pub end_date: String,
    pub image: String,
}

/// 原始记录转换失败
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordConversionError {
    pub title: String,
    pub field: &'static str,
    pub value: String,
}

impl TrackingRecord {
    /// 把已收集的变更写回记录，后续季度以此为基准对账
    ///
    /// 写回后记录不再是新增的。
    pub fn absorb(&mut self, payload: &AnimePayload) {
        if let Some(episode) = payload.episode {
            self.watched_episodes = Some(episode);
        }
        if let Some(status) = payload.status {
            self.status = Some(status);
        }
        if let Some(score) = payload.score {
            self.score = Some(score);
        }
        if let Some(date) = payload.date_start {
            self.start_date = Some(date);
        }
        if let Some(date) = payload.date_finish {
            self.finish_date = Some(date);
        }
        if let Some(tags) = &payload.tags {
            self.tags = tags.clone();
        }
        self.is_new = false;
    }
}

impl fmt::Display for RecordConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "记录 '{}' 的字段 {} 无效: '{}'",
            self.title, self.field, self.value
        )
    }
}

impl std::error::Error for RecordConversionError {}

/// 解析可选数值字段；空串或 0 视为未设置
fn parse_optional_count(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok().filter(|n| *n > 0)
}

fn parse_id(title: &str, value: &str) -> Result<u32, RecordConversionError> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| RecordConversionError {
            title: title.to_string(),
            field: "id",
            value: value.to_string(),
        })
}

impl TryFrom<RawListEntry> for TrackingRecord {
    type Error = RecordConversionError;

    fn try_from(raw: RawListEntry) -> Result<Self, Self::Error> {
        let id = parse_id(&raw.series_title, &raw.series_animedb_id)?;
        let status = raw
            .my_status
            .trim()
            .parse::<u8>()
            .ok()
            .and_then(WatchStatus::from_code);

        Ok(Self {
            id,
            total_episodes: parse_optional_count(&raw.series_episodes),
            watched_episodes: raw.my_watched_episodes.trim().parse().ok(),
            status,
            score: raw.my_score.trim().parse().ok(),
            start_date: parse_service_date(&raw.my_start_date),
            finish_date: parse_service_date(&raw.my_finish_date),
            tags: raw.my_tags.trim().to_string(),
            title: raw.series_title,
            is_new: false,
        })
    }
}

impl TryFrom<RawSeriesInfo> for TrackingRecord {
    type Error = RecordConversionError;

    /// 搜索结果没有个人字段，转换后标记为新增
    fn try_from(raw: RawSeriesInfo) -> Result<Self, Self::Error> {
        let id = parse_id(&raw.title, &raw.id)?;
        Ok(Self {
            id,
            total_episodes: parse_optional_count(&raw.episodes),
            watched_episodes: None,
            status: None,
            score: None,
            start_date: None,
            finish_date: None,
            tags: String::new(),
            title: raw.title,
            is_new: true,
        })
    }
}
