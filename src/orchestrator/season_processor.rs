//! 单个季度处理器 - 编排层
//!
//! ## 职责
//!
//! 按表格顺序逐行处理一个季度，是季度级别的编排器。
//!
//! ## 核心功能
//!
//! 1. **匹配记录**：标题 → 追番记录（缓存优先，必要时远程搜索）
//! 2. **对账**：委托 `workflow::reconcile_row`
//! 3. **规范化**：只保留真正的变更
//! 4. **收集**：变更进入结果，无法对账的行进入错误列表
//! 5. **跨季度状态**：整季处理完后再统一更新 `OngoingMap`
//!
//! 行与行之间严格顺序执行，上一行结束后才开始下一行。

use tracing::{debug, info, warn};

use crate::clients::RemoteLookup;
use crate::error::ReconcileError;
use crate::models::{AnimePayload, RunError, SeasonStats};
use crate::services::{normalize, resolve_record, RecordCache};
use crate::workflow::{apply_carries, reconcile_row, Carry, OngoingMap, SeasonContext};

/// 一个季度的处理结果
#[derive(Debug, Default)]
pub struct SeasonOutcome {
    /// 规范化后、确有变更的载荷（按表格顺序）
    pub results: Vec<AnimePayload>,
    pub errors: Vec<RunError>,
    pub stats: SeasonStats,
}

/// 处理单个季度
///
/// # 参数
/// - `season`: 季度上下文
/// - `rows`: 该季度的所有投票行
/// - `cache`: 本次运行的标题 → 记录缓存
/// - `remote`: 缓存未命中时使用的远程查询
/// - `ongoing`: 跨季度仍在播出的番剧，整季结束后才被修改
///
/// 行级错误不会中断本季度，全部记录在返回值的 `errors` 中。
pub async fn process_season<R: RemoteLookup>(
    season: &SeasonContext,
    rows: &[Vec<String>],
    cache: &mut RecordCache,
    remote: &R,
    ongoing: &mut OngoingMap,
) -> SeasonOutcome {
    let mut outcome = SeasonOutcome::default();
    let mut carries = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        let row_number = index + 1;
        let title = row.first().map(|cell| cell.trim()).unwrap_or_default();
        if title.is_empty() {
            debug!("{} #{} 空标题，跳过", season, row_number);
            continue;
        }
        outcome.stats.rows_seen += 1;

        match process_row(season, row, title, cache, remote, ongoing).await {
            Ok((payload, carry)) => {
                carries.push((payload.id, carry));
                if payload.has_changes() {
                    debug!("{} #{} ✓ {} 有变更", season, row_number, title);
                    // 后续季度要在这次变更的基础上对账
                    cache.absorb(title, &payload);
                    outcome.stats.updates += 1;
                    outcome.results.push(payload);
                } else {
                    debug!("{} #{} {} 无变更", season, row_number, title);
                    outcome.stats.unchanged += 1;
                }
            }
            Err(e) => {
                warn!("{} #{} ⚠️ {}: {}", season, row_number, title, e);
                outcome.stats.errors += 1;
                outcome
                    .errors
                    .push(RunError::for_row(&season.title, title, row_number, &e));
            }
        }
    }

    let carried = carries
        .iter()
        .filter(|(_, carry)| matches!(carry, Carry::Insert(_)))
        .count();
    apply_carries(ongoing, carries);
    if carried > 0 {
        info!("{} 📺 {} 部番剧延续到下一季度", season, carried);
    }

    outcome
}

/// 处理单行：匹配 → 对账 → 规范化
async fn process_row<R: RemoteLookup>(
    season: &SeasonContext,
    row: &[String],
    title: &str,
    cache: &mut RecordCache,
    remote: &R,
    ongoing: &OngoingMap,
) -> Result<(AnimePayload, Carry), ReconcileError> {
    let record = resolve_record(title, cache, remote).await?;
    let reconciled = reconcile_row(row, &record, season, ongoing)?;
    let payload = normalize(reconciled.payload, &record)?;
    Ok((payload, reconciled.carry))
}
