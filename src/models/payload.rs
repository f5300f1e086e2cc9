//! 推送给追番服务的变更载荷
//!
//! 每个可选字段都是 `Option`：`None` 表示"不变更"，
//! 序列化时直接省略。

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::record::WatchStatus;

/// 单部番剧的对账结果 / 更新载荷
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnimePayload {
    pub id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<WatchStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
    #[serde(default, with = "service_date", skip_serializing_if = "Option::is_none")]
    pub date_start: Option<NaiveDate>,
    #[serde(default, with = "service_date", skip_serializing_if = "Option::is_none")]
    pub date_finish: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    /// 需要新增而不是更新
    #[serde(rename = "new", default, skip_serializing_if = "std::ops::Not::not")]
    pub is_new: bool,
}

impl AnimePayload {
    /// 创建只含 id 的空载荷
    pub fn new(id: u32) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    /// 是否包含真正的变更（id / title / new 不算）
    pub fn has_changes(&self) -> bool {
        self.episode.is_some()
            || self.status.is_some()
            || self.score.is_some()
            || self.date_start.is_some()
            || self.date_finish.is_some()
            || self.tags.is_some()
    }
}

/// 追番服务的日期格式：`YYYY-MM-DD`，`0000-00-00` 表示未设置
mod service_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::models::season::{format_date, parse_service_date};

    pub fn serialize<S: Serializer>(
        date: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match date {
            Some(date) => serializer.serialize_str(&format_date(*date)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse_service_date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_payload_serializes_id_only() {
        let payload = AnimePayload::new(7);
        assert_eq!(serde_json::to_string(&payload).unwrap(), r#"{"id":7}"#);
        assert!(!payload.has_changes());
    }

    #[test]
    fn test_payload_serializes_dates_and_status() {
        let payload = AnimePayload {
            id: 7,
            status: Some(WatchStatus::Completed),
            date_finish: NaiveDate::from_ymd_opt(2014, 4, 5),
            is_new: true,
            ..AnimePayload::new(7)
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["status"], 2);
        assert_eq!(json["date_finish"], "2014-04-05");
        assert_eq!(json["new"], true);
        assert!(json.get("episode").is_none());
        assert!(payload.has_changes());
    }

    #[test]
    fn test_title_and_new_are_not_changes() {
        let payload = AnimePayload {
            title: Some("foo".to_string()),
            is_new: true,
            ..AnimePayload::new(1)
        };
        assert!(!payload.has_changes());
    }

    #[test]
    fn test_service_dates_are_zero_padded_and_unset_is_none() {
        let payload = AnimePayload {
            date_start: NaiveDate::from_ymd_opt(2014, 1, 4),
            ..AnimePayload::new(7)
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["date_start"], "2014-01-04");

        let parsed: AnimePayload =
            serde_json::from_str(r#"{"id":7,"date_start":"0000-00-00"}"#).unwrap();
        assert_eq!(parsed.date_start, None);
        assert_eq!(parsed.date_finish, None);
    }
}
