/// 日志工具模块
///
/// 提供运行横幅与统计信息的输出辅助函数
use tracing::info;

use crate::config::Config;
use crate::models::{RunSummary, SeasonStats};

/// 记录程序启动信息
///
/// # 参数
/// - `config`: 本次运行的配置
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 投票表 → 追番列表同步");
    info!("👤 用户: {}", config.mal_username);
    if config.seasons.is_empty() {
        info!("📅 季度: 自动发现");
    } else {
        info!("📅 季度: {}", config.seasons.join(", "));
    }
    if config.dry_run {
        info!("🧪 演练模式：只写报告，不推送");
    }
    info!("{}", "=".repeat(60));
}

/// 记录季度开始信息
///
/// # 参数
/// - `season`: 季度工作表名称
/// - `index`: 季度序号（从 1 开始）
/// - `total`: 季度总数
pub fn log_season_start(season: &str, index: usize, total: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始处理第 {}/{} 个季度: {}", index, total, season);
    info!("{}", "=".repeat(60));
}

/// 记录季度完成信息
pub fn log_season_complete(season: &str, stats: &SeasonStats) {
    info!("\n{}", "─".repeat(60));
    info!(
        "✓ [{}] 完成: {} 行，变更 {}，无变更 {}，错误 {}",
        season, stats.rows_seen, stats.updates, stats.unchanged, stats.errors
    );
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
///
/// # 参数
/// - `summary`: 整次运行的统计
/// - `logs_path`: 报告目录
pub fn print_final_stats(summary: &RunSummary, logs_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!(
        "📅 季度: 已处理 {}，跳过 {}",
        summary.seasons_processed, summary.seasons_skipped
    );
    info!("📄 行数: {}", summary.rows_seen);
    info!("✅ 变更: {}", summary.updates);
    info!("➖ 无变更: {}", summary.unchanged);
    info!("❌ 错误: {}", summary.errors);
    info!("{}", "=".repeat(60));
    info!("\n报告已保存至: {}", logs_path);
}
