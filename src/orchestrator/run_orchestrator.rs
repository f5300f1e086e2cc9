//! 整次运行处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责一次完整的同步运行。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：创建投票表与追番服务客户端
//! 2. **拉取列表**：一次性拉取用户的完整番剧列表并建立缓存（失败即中止）
//! 3. **季度排序**：按时间顺序（最早的在前）处理季度，未配置时从投票表自动发现
//! 4. **逐季处理**：委托 `season_processor` 处理单个季度
//! 5. **推送变更**：新番剧调用新增接口，其余调用更新接口（演练模式跳过）
//! 6. **写出报告**：结果与错误写入 logs 目录
//!
//! 缓存与 `OngoingMap` 每次运行创建一份，显式传入下层，运行结束即丢弃。

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use tracing::{debug, info, warn};

use crate::clients::{SheetFetcher, SheetsClient, TrackingClient, TrackingService};
use crate::config::Config;
use crate::error::{ConfigError, ReconcileError};
use crate::models::{
    chronological, parse_sheet_date, AnimePayload, RunError, RunSummary, SeasonName,
};
use crate::orchestrator::season_processor::process_season;
use crate::services::{RecordCache, ReportWriter};
use crate::utils::logging::{
    log_season_complete, log_season_start, log_startup, print_final_stats,
};
use crate::workflow::{OngoingMap, SeasonContext};

/// 应用主结构
pub struct App<S, T> {
    config: Config,
    sheets: S,
    tracking: T,
    today: NaiveDate,
}

impl App<SheetsClient, TrackingClient> {
    /// 使用真实的 HTTP 客户端初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        let sheets = SheetsClient::new(&config).context("创建投票表客户端失败")?;
        let tracking = TrackingClient::new(&config).context("创建追番服务客户端失败")?;
        Ok(Self::with_clients(config, sheets, tracking))
    }
}

impl<S: SheetFetcher, T: TrackingService> App<S, T> {
    /// 使用指定的客户端创建应用，"今天"取本地日期
    pub fn with_clients(config: Config, sheets: S, tracking: T) -> Self {
        Self {
            config,
            sheets,
            tracking,
            today: Local::now().date_naive(),
        }
    }

    /// 指定计算所用的"今天"
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<RunSummary> {
        log_startup(&self.config);

        let configured = self.config.ordered_seasons().context("季度配置无效")?;

        // 拉取完整列表，失败则整个运行没有意义
        info!("\n📥 正在拉取番剧列表...");
        let entries = self
            .tracking
            .fetch_anime_list()
            .await
            .context("拉取番剧列表失败")?;
        let mut cache = RecordCache::from_entries(entries);
        info!("✓ 已缓存 {} 部番剧", cache.len());

        let seasons = self.resolve_seasons(configured).await?;

        let mut ongoing = OngoingMap::new();
        let mut results: Vec<AnimePayload> = Vec::new();
        let mut errors: Vec<RunError> = Vec::new();
        let mut summary = RunSummary::default();

        let total = seasons.len();
        for (index, season_name) in seasons.iter().enumerate() {
            let title = season_name.raw.as_str();
            log_season_start(title, index + 1, total);

            let raw_date = self
                .sheets
                .get_season_start_date(title)
                .await
                .with_context(|| format!("读取 {} 的开始日期失败", title))?;

            let Some(start_date) = parse_sheet_date(&raw_date) else {
                let err = ReconcileError::MalformedStartDate {
                    raw: raw_date.clone(),
                };
                warn!("[{}] ⚠️ {}，跳过整个季度", title, err);
                errors.push(RunError::for_season(title, &raw_date, &err));
                summary.record_skipped_season();
                continue;
            };

            let rows = self
                .sheets
                .get_season_rows(title)
                .await
                .with_context(|| format!("读取 {} 的投票行失败", title))?;

            let season = SeasonContext::new(title, start_date, self.today);
            debug!(
                "{} 开始日期 {}，标签 {}，已结束: {}",
                season, season.start_date, season.tag, season.finished
            );

            let outcome =
                process_season(&season, &rows, &mut cache, &self.tracking, &mut ongoing).await;

            log_season_complete(title, &outcome.stats);
            summary.record_season(&outcome.stats);
            results.extend(outcome.results);
            errors.extend(outcome.errors);
        }

        if self.config.verbose_logging {
            for payload in &results {
                info!("📝 {}", serde_json::to_string(payload)?);
            }
        }

        if self.config.dry_run {
            info!("🧪 演练模式，跳过推送 {} 条变更", results.len());
        } else {
            self.push(&results).await?;
        }

        ReportWriter::new(&self.config.logs_path)
            .write(&results, &errors)
            .context("写入报告失败")?;

        print_final_stats(&summary, &self.config.logs_path);
        Ok(summary)
    }

    /// 配置了季度就直接使用，否则从投票表的工作表标题中发现
    async fn resolve_seasons(&self, configured: Vec<SeasonName>) -> Result<Vec<SeasonName>> {
        if !configured.is_empty() {
            return Ok(configured);
        }

        info!("\n🔍 未配置季度，从投票表发现工作表...");
        let titles = self
            .sheets
            .list_seasons()
            .await
            .context("读取工作表列表失败")?;

        let discovered = titles.iter().filter_map(|title| {
            let season = SeasonName::parse(title);
            if season.is_none() {
                debug!("工作表 '{}' 不是季度，忽略", title);
            }
            season
        });
        let seasons = chronological(discovered);
        if seasons.is_empty() {
            return Err(ConfigError::NoSeasons.into());
        }

        info!("✓ 发现 {} 个季度", seasons.len());
        Ok(seasons)
    }

    /// 按收集顺序推送变更
    ///
    /// 新番剧只有第一条载荷带 `is_new`，之后的季度都已写回缓存。
    async fn push(&self, results: &[AnimePayload]) -> Result<()> {
        info!("\n🚀 开始推送 {} 条变更", results.len());

        for payload in results {
            if payload.is_new {
                debug!("新增: {} ({:?})", payload.id, payload.title);
                self.tracking
                    .add_anime(payload)
                    .await
                    .with_context(|| format!("新增番剧 {} 失败", payload.id))?;
            } else {
                debug!("更新: {} ({:?})", payload.id, payload.title);
                self.tracking
                    .update_anime(payload)
                    .await
                    .with_context(|| format!("更新番剧 {} 失败", payload.id))?;
            }
        }

        info!("✓ 推送完成");
        Ok(())
    }
}
