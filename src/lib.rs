//! # Friday Fellows Updater
//!
//! 把每周投票表的结果同步到追番服务的番剧列表
//!
//! ## 架构设计
//!
//! 本系统采用严格的分层架构：
//!
//! ### ① 外部服务层（Clients）
//! - `clients/` - 投票表与追番服务的 HTTP 客户端
//! - `SheetFetcher` / `RemoteLookup` / `TrackingService` - 核心逻辑只依赖这些 trait
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，不关心流程
//! - `record_matcher` - 标题 → 追番记录
//! - `normalizer` - 去掉与记录相同的字段
//! - `report_writer` - 写 results / errors 报告
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一行投票"的完整对账流程
//! - `SeasonContext` - 季度上下文（开始日期 + 是否已结束）
//! - `reconcile_row` - 投票 → 集数 / 状态 / 日期 / 标签
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/run_orchestrator` - 整次运行，按时间顺序调度季度
//! - `orchestrator/season_processor` - 单个季度，逐行处理
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{RemoteLookup, SheetFetcher, TrackingService};
pub use config::Config;
pub use error::{AppError, AppResult, ReconcileError};
pub use models::{AnimePayload, RunError, RunSummary, TrackingRecord, VoteCell, WatchStatus};
pub use orchestrator::{process_season, App};
pub use workflow::{reconcile_row, OngoingMap, SeasonContext};
