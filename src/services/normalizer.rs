//! 载荷规范化
//!
//! 去掉与追番记录已有值相同的字段，只留下真正的变更。

use crate::error::ReconcileError;
use crate::models::{AnimePayload, TrackingRecord};

/// 只有当 `computed` 有值且与记录不同时才保留
fn keep_changed<T: PartialEq>(computed: Option<T>, existing: Option<&T>) -> Option<T> {
    match computed {
        Some(value) if existing != Some(&value) => Some(value),
        _ => None,
    }
}

/// 规范化对账结果
///
/// `id` / `title` / `new` 原样保留；`episode`、`status`、`score`、
/// `date_start`、`date_finish`、`tags` 与记录相同则去掉。
///
/// 载荷与记录 id 不一致说明匹配出了问题，返回 [`ReconcileError::IdMismatch`]。
pub fn normalize(
    computed: AnimePayload,
    record: &TrackingRecord,
) -> Result<AnimePayload, ReconcileError> {
    if computed.id != record.id {
        return Err(ReconcileError::IdMismatch {
            payload_id: computed.id,
            record_id: record.id,
        });
    }

    Ok(AnimePayload {
        id: computed.id,
        title: computed.title,
        episode: keep_changed(computed.episode, record.watched_episodes.as_ref()),
        status: keep_changed(computed.status, record.status.as_ref()),
        score: keep_changed(computed.score, record.score.as_ref()),
        date_start: keep_changed(computed.date_start, record.start_date.as_ref()),
        date_finish: keep_changed(computed.date_finish, record.finish_date.as_ref()),
        tags: keep_changed(computed.tags, Some(&record.tags)),
        is_new: computed.is_new,
    })
}
