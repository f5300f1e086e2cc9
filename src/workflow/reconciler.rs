//! 季度对账流程 - 流程层
//!
//! 核心职责：根据一行投票记录推断一部番剧的观看状态
//!
//! 流程顺序：
//! 1. 季度标签（记录里没有就加在最前面）
//! 2. 第一集投票 → 开始日期
//! 3. 最后一个投票格 → 最后一次投票
//! 4. 投票结果分支（被投下 / 季度进行中 / 季度已结束）
//! 5. 集数等于总集数时强制标记为看完
//!
//! 本模块不做任何 I/O，只读取跨季度的 [`OngoingMap`]，
//! 对它的修改以 [`Carry`] 的形式返回，由编排层在整季处理完后统一应用。

use std::collections::HashMap;
use tracing::debug;

use crate::error::ReconcileError;
use crate::models::season::WEEKS_PER_SEASON;
use crate::models::vote::{is_bye, is_vote_cell, parse_vote_cell, FIRST_EPISODE_PREFIX};
use crate::models::{AnimePayload, TrackingRecord, WatchStatus};
use crate::workflow::season_ctx::SeasonContext;

/// 跨季度仍在播出的番剧：id → 最近一次的对账结果（规范化之前）
pub type OngoingMap = HashMap<u32, AnimePayload>;

/// 对 [`OngoingMap`] 的修改指令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Carry {
    /// 不变
    Keep,
    /// 继续播出，写入（或覆盖）本次结果
    Insert(AnimePayload),
    /// 已看完或被投下，移出
    Remove,
}

/// 单行对账结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowOutcome {
    /// 规范化之前的完整结果
    pub payload: AnimePayload,
    pub carry: Carry,
}

/// 对一行投票记录进行对账
///
/// # 参数
/// - `row`: 一行单元格，第 0 列为标题
/// - `record`: 已匹配的追番记录
/// - `season`: 季度上下文
/// - `ongoing`: 之前季度遗留的仍在播出的番剧
///
/// # 返回
/// 没有任何投票格或最后一个投票格无法解析时返回行级错误
pub fn reconcile_row(
    row: &[String],
    record: &TrackingRecord,
    season: &SeasonContext,
    ongoing: &OngoingMap,
) -> Result<RowOutcome, ReconcileError> {
    let mut result = AnimePayload {
        title: Some(record.title.clone()),
        is_new: record.is_new,
        ..AnimePayload::new(record.id)
    };

    // ========== 1. 季度标签 ==========
    if !record.tags.contains(&season.tag) {
        result.tags = Some(if record.tags.is_empty() {
            season.tag.clone()
        } else {
            format!("{}, {}", season.tag, record.tags)
        });
    }

    // ========== 2. 开始日期 ==========
    let episode1_index = row
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, cell)| cell.starts_with(FIRST_EPISODE_PREFIX))
        .map(|(i, _)| i);
    if let Some(index) = episode1_index {
        result.date_start = Some(season.week_date(index));
        result.status = Some(WatchStatus::Watching);
    }

    // ========== 3. 最后一次投票 ==========
    let end_index = (1..row.len())
        .rev()
        .find(|&i| is_vote_cell(&row[i]))
        .ok_or(ReconcileError::MissingVoteCell)?;
    let last_vote = parse_vote_cell(end_index, &row[end_index]);
    let Some(last_episode) = last_vote.episode.filter(|_| last_vote.is_valid()) else {
        return Err(ReconcileError::MalformedVoteCell {
            index: end_index,
            cell: row[end_index].clone(),
        });
    };

    // ========== 4. 投票结果分支 ==========
    let total = record.total_episodes;
    let mut carries_over = false;

    if last_vote.is_voted_off() {
        // 被投下，这就是最后看到的一集
        result.status = Some(WatchStatus::Dropped);
        result.episode = Some(last_episode);
    } else if !season.finished {
        // 当前季度，仍在追
        if last_populated_cell(row).is_some_and(is_bye) {
            // 最近是轮空周，沿用最后一次投票的集数
            result.episode = Some(last_episode);
            result.status = Some(WatchStatus::Watching);
        } else {
            let weeks_since_vote = season.elapsed_weeks() - end_index as i64;
            let projected = (i64::from(last_episode) + weeks_since_vote).max(i64::from(last_episode));
            let projected = u32::try_from(projected).unwrap_or(last_episode);
            match total {
                Some(total) if projected >= total => {
                    result.episode = Some(total);
                    result.status = Some(WatchStatus::Completed);
                }
                _ => {
                    result.episode = Some(projected);
                    result.status = Some(WatchStatus::Watching);
                }
            }
        }
    } else {
        // 季度已结束，番剧挺过了整季
        match ongoing.get(&record.id).and_then(|prev| prev.episode) {
            Some(prev_episode) => match total {
                Some(total) if prev_episode + WEEKS_PER_SEASON >= total => {
                    result.episode = Some(total);
                    result.date_finish =
                        Some(season.weeks_after_start(i64::from(total) - i64::from(prev_episode)));
                    result.status = Some(WatchStatus::Completed);
                }
                _ => {
                    result.episode = Some(prev_episode + WEEKS_PER_SEASON);
                    result.status = Some(WatchStatus::Watching);
                    carries_over = true;
                }
            },
            None => match total {
                Some(total) if total <= WEEKS_PER_SEASON => {
                    let first_week = episode1_index.unwrap_or(1) as i64;
                    result.episode = Some(total);
                    result.date_finish =
                        Some(season.weeks_after_start(i64::from(total) + first_week - 1));
                    result.status = Some(WatchStatus::Completed);
                }
                _ => {
                    // 跨季度的长篇，第一次遇到
                    result.episode = Some(WEEKS_PER_SEASON);
                    result.status = Some(WatchStatus::Watching);
                    carries_over = true;
                }
            },
        }
    }

    // ========== 5. 看完覆盖 ==========
    if total.is_some() && result.episode == total {
        result.status = Some(WatchStatus::Completed);
        if result.date_finish.is_none() {
            result.date_finish = Some(season.week_date(end_index));
        }
    }

    let carry = match result.status {
        Some(WatchStatus::Completed) | Some(WatchStatus::Dropped) => Carry::Remove,
        _ if carries_over => Carry::Insert(result.clone()),
        _ => Carry::Keep,
    };

    debug!(
        "{} {} '{}' → 第 {:?} 集 {:?}",
        season,
        record.title,
        row[end_index],
        result.episode,
        result.status
    );

    Ok(RowOutcome {
        payload: result,
        carry,
    })
}

/// 把一个季度收集到的修改指令应用到 [`OngoingMap`]
pub fn apply_carries(ongoing: &mut OngoingMap, carries: Vec<(u32, Carry)>) {
    for (id, carry) in carries {
        match carry {
            Carry::Keep => {}
            Carry::Insert(payload) => {
                ongoing.insert(id, payload);
            }
            Carry::Remove => {
                ongoing.remove(&id);
            }
        }
    }
}

/// 最后一个非空单元格（不含标题列）
fn last_populated_cell(row: &[String]) -> Option<&str> {
    row.iter()
        .skip(1)
        .rev()
        .map(|cell| cell.trim())
        .find(|cell| !cell.is_empty())
}
