//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责季度调度与整次运行的生命周期，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `run_orchestrator` - 整次运行处理器
//! - 创建客户端
//! - 拉取番剧列表、建立缓存
//! - 按时间顺序遍历季度（Vec<SeasonName>）
//! - 推送变更、写出报告、输出全局统计
//!
//! ### `season_processor` - 单个季度处理器
//! - 逐行处理投票表（Vec<Vec<String>>）
//! - 收集结果与错误
//! - 整季结束后更新 `OngoingMap`
//!
//! ## 层次关系
//!
//! ```text
//! run_orchestrator (处理 Vec<Season>)
//!     ↓
//! season_processor (处理 Vec<Row>)
//!     ↓
//! workflow::reconcile_row (处理单行)
//!     ↓
//! services (能力层：record_matcher / normalizer / report_writer)
//!     ↓
//! clients (外部服务：投票表 / 追番服务)
//! ```

pub mod run_orchestrator;
pub mod season_processor;

// 重新导出主要类型
pub use run_orchestrator::App;
pub use season_processor::{process_season, SeasonOutcome};
