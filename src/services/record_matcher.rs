//! 记录匹配服务 - 业务能力层
//!
//! 只负责"标题 → 追番记录"的解析，不关心流程

use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::clients::RemoteLookup;
use crate::error::ReconcileError;
use crate::models::{AnimePayload, RawListEntry, TrackingRecord};

/// 本次运行的标题 → 记录缓存
///
/// 标题严格按原文匹配（区分大小写，不做任何规范化）。
#[derive(Debug, Default, Clone)]
pub struct RecordCache {
    records: HashMap<String, TrackingRecord>,
}

impl RecordCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 由用户列表构建缓存，无法转换的条目跳过并记录警告
    pub fn from_entries(entries: Vec<RawListEntry>) -> Self {
        let mut cache = Self::new();
        for entry in entries {
            match TrackingRecord::try_from(entry) {
                Ok(record) => cache.insert(record),
                Err(e) => warn!("⚠️ 跳过无效的列表条目: {}", e),
            }
        }
        cache
    }

    pub fn insert(&mut self, record: TrackingRecord) {
        self.records.insert(record.title.clone(), record);
    }

    pub fn get(&self, title: &str) -> Option<&TrackingRecord> {
        self.records.get(title)
    }

    /// 把一行已收集的变更写回缓存中的记录
    pub fn absorb(&mut self, title: &str, payload: &AnimePayload) {
        if let Some(record) = self.records.get_mut(title) {
            record.absorb(payload);
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// 解析标题对应的追番记录
///
/// 1. 先查本地缓存
/// 2. 未命中时远程搜索，只有标题完全一致才接受，并标记为新增
///
/// 远程调用失败或标题不一致都返回 [`ReconcileError::UnresolvedTitle`]，
/// 不会向上抛出 I/O 错误。
pub async fn resolve_record<R: RemoteLookup>(
    title: &str,
    cache: &mut RecordCache,
    remote: &R,
) -> Result<TrackingRecord, ReconcileError> {
    if let Some(record) = cache.get(title) {
        return Ok(record.clone());
    }

    let unresolved = || ReconcileError::UnresolvedTitle {
        title: title.to_string(),
    };

    debug!("缓存未命中，远程搜索: {}", title);
    let info = match remote.search_by_title(title).await {
        Ok(info) => info,
        Err(e) => {
            warn!("⚠️ 远程搜索失败 '{}': {}", title, e);
            return Err(unresolved());
        }
    };

    if info.title != title {
        warn!(
            "⚠️ 搜索结果标题不一致: 期望 '{}'，得到 '{}'",
            title, info.title
        );
        return Err(unresolved());
    }

    let record = TrackingRecord::try_from(info).map_err(|e| {
        warn!("⚠️ 搜索结果无效: {}", e);
        unresolved()
    })?;

    info!("✓ 远程找到新番剧: {} (id: {})", record.title, record.id);
    cache.insert(record.clone());
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, AppResult};
    use crate::models::RawSeriesInfo;
    use std::cell::Cell;

    /// 返回固定结果并统计调用次数的远程查询
    struct FakeLookup {
        result: Option<RawSeriesInfo>,
        calls: Cell<usize>,
    }

    impl FakeLookup {
        fn returning(id: &str, title: &str) -> Self {
            Self {
                result: Some(RawSeriesInfo {
                    id: id.to_string(),
                    title: title.to_string(),
                    episodes: "12".to_string(),
                    ..Default::default()
                }),
                calls: Cell::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                result: None,
                calls: Cell::new(0),
            }
        }
    }

    impl RemoteLookup for FakeLookup {
        async fn search_by_title(&self, _title: &str) -> AppResult<RawSeriesInfo> {
            self.calls.set(self.calls.get() + 1);
            self.result
                .clone()
                .ok_or_else(|| AppError::Other("not found".to_string()))
        }
    }

    fn cached_cache() -> RecordCache {
        RecordCache::from_entries(vec![RawListEntry {
            series_animedb_id: "1".to_string(),
            series_title: "Danganronpa".to_string(),
            series_episodes: "13".to_string(),
            ..Default::default()
        }])
    }

    #[tokio::test]
    async fn test_cache_hit_skips_remote() {
        let mut cache = cached_cache();
        let remote = FakeLookup::failing();
        let record = resolve_record("Danganronpa", &mut cache, &remote).await.unwrap();
        assert_eq!(record.id, 1);
        assert!(!record.is_new);
        assert_eq!(remote.calls.get(), 0);
    }

    #[tokio::test]
    async fn test_cache_is_case_sensitive() {
        let mut cache = cached_cache();
        let remote = FakeLookup::failing();
        let err = resolve_record("danganronpa", &mut cache, &remote)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ReconcileError::UnresolvedTitle {
                title: "danganronpa".to_string()
            }
        );
        assert_eq!(remote.calls.get(), 1);
    }

    #[tokio::test]
    async fn test_remote_exact_match_is_new_and_cached() {
        let mut cache = RecordCache::new();
        let remote = FakeLookup::returning("99", "Gegege no Kitaro (2018)");

        let record = resolve_record("Gegege no Kitaro (2018)", &mut cache, &remote)
            .await
            .unwrap();
        assert_eq!(record.id, 99);
        assert!(record.is_new);
        assert_eq!(record.watched_episodes, None);

        // 第二次命中缓存
        resolve_record("Gegege no Kitaro (2018)", &mut cache, &remote)
            .await
            .unwrap();
        assert_eq!(remote.calls.get(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_remote_title_mismatch_is_not_found() {
        let mut cache = RecordCache::new();
        let remote = FakeLookup::returning("99", "Gegege no Kitarou");
        let result = resolve_record("Gegege no Kitaro (2018)", &mut cache, &remote).await;
        assert!(result.is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_from_entries_skips_invalid() {
        let cache = RecordCache::from_entries(vec![
            RawListEntry {
                series_animedb_id: "abc".to_string(),
                series_title: "Broken".to_string(),
                ..Default::default()
            },
            RawListEntry {
                series_animedb_id: "2".to_string(),
                series_title: "Fine".to_string(),
                ..Default::default()
            },
        ]);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("Fine").is_some());
        assert!(cache.get("Broken").is_none());
    }
}
