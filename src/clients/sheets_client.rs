/// 表格服务 API 客户端
///
/// 只负责读取投票表的工作表列表与单元格，令牌由外部提供
use crate::clients::SheetFetcher;
use crate::config::Config;
use crate::error::{AppError, AppResult};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// values.get 接口的响应
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ValueRange {
    range: String,
    values: Vec<Vec<String>>,
}

/// spreadsheets.get 接口的响应（只请求工作表标题）
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SpreadsheetMeta {
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SheetProperties {
    title: String,
}

/// 表格服务客户端
pub struct SheetsClient {
    http: Client,
    base_url: String,
    access_token: String,
    spreadsheet_id: String,
    rows_range: String,
    start_cell: String,
}

impl SheetsClient {
    /// 创建新的表格客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.sheets_api_base_url.trim_end_matches('/').to_string(),
            access_token: config.sheets_access_token.clone(),
            spreadsheet_id: config.spreadsheet_id.clone(),
            rows_range: config.season_rows_range.clone(),
            start_cell: config.season_start_cell.clone(),
        })
    }

    /// 投票表本身的 URL：`{base}/spreadsheets/{id}`
    fn spreadsheet_url(&self) -> AppResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| AppError::api_request_failed(&self.base_url, e))?;
        url.path_segments_mut()
            .map_err(|_| AppError::Other(format!("无效的表格服务地址: {}", self.base_url)))?
            .extend(["spreadsheets", self.spreadsheet_id.as_str()]);
        Ok(url)
    }

    /// 构建 spreadsheets.get 的 URL，只取工作表标题
    fn sheets_url(&self) -> AppResult<Url> {
        let mut url = self.spreadsheet_url()?;
        url.query_pairs_mut()
            .append_pair("fields", "sheets.properties.title");
        Ok(url)
    }

    /// 构建 values.get 的 URL，范围形如 `'WINTER 2014'!A2:K30`
    fn values_url(&self, season: &str, cells: &str) -> AppResult<Url> {
        let mut url = self.spreadsheet_url()?;
        url.path_segments_mut()
            .map_err(|_| AppError::Other(format!("无效的表格服务地址: {}", self.base_url)))?
            .push("values")
            .push(&format!("'{}'!{}", season, cells));
        url.query_pairs_mut().append_pair("majorDimension", "ROWS");
        Ok(url)
    }

    async fn get_values(&self, season: &str, cells: &str) -> AppResult<ValueRange> {
        let url = self.values_url(season, cells)?;
        debug!("读取表格范围: {}", url);

        let range: ValueRange = self.get_json(url).await?;
        debug!("范围 {} 共 {} 行", range.range, range.values.len());
        Ok(range)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> AppResult<T> {
        let mut request = self.http.get(url.clone());
        if !self.access_token.is_empty() {
            request = request.bearer_auth(&self.access_token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(url.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.ok().filter(|t| !t.is_empty());
            return Err(AppError::api_bad_response(url.as_str(), status.as_u16(), message));
        }

        Ok(response.json().await?)
    }
}

impl SheetFetcher for SheetsClient {
    async fn list_seasons(&self) -> AppResult<Vec<String>> {
        let url = self.sheets_url()?;
        debug!("读取工作表列表: {}", url);
        let meta: SpreadsheetMeta = self.get_json(url).await?;
        Ok(sheet_titles(meta))
    }

    async fn get_season_rows(&self, season: &str) -> AppResult<Vec<Vec<String>>> {
        let range = self.get_values(season, &self.rows_range).await?;
        Ok(range.values)
    }

    async fn get_season_start_date(&self, season: &str) -> AppResult<String> {
        // 空单元格交给上层按无效日期处理
        let range = self.get_values(season, &self.start_cell).await?;
        Ok(first_cell(range).unwrap_or_default())
    }
}

fn sheet_titles(meta: SpreadsheetMeta) -> Vec<String> {
    meta.sheets
        .into_iter()
        .map(|sheet| sheet.properties.title)
        .collect()
}

fn first_cell(range: ValueRange) -> Option<String> {
    range.values.into_iter().next()?.into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_client() -> SheetsClient {
        let config = Config {
            sheets_api_base_url: "https://sheets.example.com/v4/".to_string(),
            spreadsheet_id: "sheet-id".to_string(),
            ..Config::default()
        };
        SheetsClient::new(&config).unwrap()
    }

    #[test]
    fn test_values_url_encodes_range() {
        let client = create_test_client();
        let url = client.values_url("WINTER 2014", "A2:K30").unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.example.com/v4/spreadsheets/sheet-id/values/'WINTER%202014'!A2:K30?majorDimension=ROWS"
        );
    }

    #[test]
    fn test_sheets_url_requests_titles_only() {
        let client = create_test_client();
        let url = client.sheets_url().unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.example.com/v4/spreadsheets/sheet-id?fields=sheets.properties.title"
        );
    }

    #[test]
    fn test_sheet_titles() {
        let meta: SpreadsheetMeta = serde_json::from_str(
            r#"{"sheets":[{"properties":{"title":"SPRING 2014"}},{"properties":{"title":"Notes"}}]}"#,
        )
        .unwrap();
        assert_eq!(sheet_titles(meta), vec!["SPRING 2014", "Notes"]);
        assert!(sheet_titles(SpreadsheetMeta::default()).is_empty());
    }

    #[test]
    fn test_value_range_without_values() {
        let range: ValueRange = serde_json::from_str(r#"{"range":"'FALL 2013'!A1"}"#).unwrap();
        assert!(range.values.is_empty());
        assert_eq!(first_cell(range), None);
    }

    #[test]
    fn test_first_cell() {
        let range: ValueRange =
            serde_json::from_str(r#"{"range":"A1","values":[["2014-01-10","x"]]}"#).unwrap();
        assert_eq!(first_cell(range), Some("2014-01-10".to_string()));
    }
}
