//! 外部服务客户端
//!
//! 核心逻辑只依赖这里定义的三个 trait，
//! 具体实现（HTTP 客户端）与测试替身都实现这些 trait。

pub mod sheets_client;
pub mod tracking_client;

pub use sheets_client::SheetsClient;
pub use tracking_client::TrackingClient;

use crate::error::AppResult;
use crate::models::{AnimePayload, RawListEntry, RawSeriesInfo};

/// 按标题搜索单部番剧
#[allow(async_fn_in_trait)]
pub trait RemoteLookup {
    async fn search_by_title(&self, title: &str) -> AppResult<RawSeriesInfo>;
}

/// 追番服务：读取列表、新增与更新条目
#[allow(async_fn_in_trait)]
pub trait TrackingService: RemoteLookup {
    /// 拉取用户的完整番剧列表
    async fn fetch_anime_list(&self) -> AppResult<Vec<RawListEntry>>;

    async fn add_anime(&self, payload: &AnimePayload) -> AppResult<()>;

    async fn update_anime(&self, payload: &AnimePayload) -> AppResult<()>;
}

/// 投票表：每个季度一个工作表
#[allow(async_fn_in_trait)]
pub trait SheetFetcher {
    /// 列出投票表中所有工作表的标题
    async fn list_seasons(&self) -> AppResult<Vec<String>>;

    /// 读取季度的所有投票行（第一列为标题）
    async fn get_season_rows(&self, season: &str) -> AppResult<Vec<Vec<String>>>;

    /// 读取季度开始日期单元格的原文
    async fn get_season_start_date(&self, season: &str) -> AppResult<String>;
}
