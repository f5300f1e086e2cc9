/// 追番服务 API 客户端
///
/// 封装所有与追番服务相关的调用逻辑（列表、搜索、新增、更新）
use crate::clients::{RemoteLookup, TrackingService};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{AnimePayload, RawListEntry, RawSeriesInfo};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// 用户列表接口的响应
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AnimeListResponse {
    anime: Vec<RawListEntry>,
}

/// 追番服务客户端
pub struct TrackingClient {
    http: Client,
    base_url: String,
    username: String,
    password: String,
}

impl TrackingClient {
    /// 创建新的追番服务客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.mal_api_base_url.trim_end_matches('/').to_string(),
            username: config.mal_username.clone(),
            password: config.mal_password.clone(),
        })
    }

    fn list_url(&self) -> String {
        format!("{}/animelist/{}", self.base_url, self.username)
    }

    fn search_url(&self) -> String {
        format!("{}/anime/search", self.base_url)
    }

    fn write_url(&self, action: &str, id: u32) -> String {
        format!("{}/animelist/{}/{}", self.base_url, action, id)
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        request.basic_auth(&self.username, Some(&self.password))
    }

    /// 校验响应状态码，失败时带上响应正文
    async fn check_status(endpoint: &str, response: Response) -> AppResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.ok().filter(|t| !t.is_empty());
        Err(AppError::api_bad_response(endpoint, status.as_u16(), message))
    }

    async fn post_payload(&self, action: &str, payload: &AnimePayload) -> AppResult<()> {
        let url = self.write_url(action, payload.id);
        debug!("{} 载荷: {}", action, serde_json::to_string(payload)?);

        let response = self
            .authed(self.http.post(&url))
            .json(payload)
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(&url, e))?;
        Self::check_status(&url, response).await?;
        Ok(())
    }
}

impl RemoteLookup for TrackingClient {
    async fn search_by_title(&self, title: &str) -> AppResult<RawSeriesInfo> {
        let url = self.search_url();
        debug!("按标题搜索: {}", title);

        let response = self
            .authed(self.http.get(&url))
            .query(&[("q", title)])
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(&url, e))?;

        if response.status() == StatusCode::NOT_FOUND || response.status() == StatusCode::NO_CONTENT
        {
            return Err(AppError::Api(crate::error::ApiError::EmptyResponse {
                endpoint: url,
            }));
        }

        let response = Self::check_status(&url, response).await?;
        let body = response.text().await?;
        parse_search_body(&url, &body)
    }
}

impl TrackingService for TrackingClient {
    async fn fetch_anime_list(&self) -> AppResult<Vec<RawListEntry>> {
        let url = self.list_url();
        debug!("拉取番剧列表: {}", url);

        let response = self
            .authed(self.http.get(&url))
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(&url, e))?;
        let response = Self::check_status(&url, response).await?;
        let list: AnimeListResponse = response.json().await?;
        Ok(list.anime)
    }

    async fn add_anime(&self, payload: &AnimePayload) -> AppResult<()> {
        self.post_payload("add", payload).await
    }

    async fn update_anime(&self, payload: &AnimePayload) -> AppResult<()> {
        self.post_payload("update", payload).await
    }
}

/// 解析搜索响应；服务可能返回单个对象或数组，数组取第一项
fn parse_search_body(endpoint: &str, body: &str) -> AppResult<RawSeriesInfo> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    let first = match value {
        serde_json::Value::Array(items) => items.into_iter().next(),
        serde_json::Value::Null => None,
        other => Some(other),
    };

    match first {
        Some(item) => Ok(serde_json::from_value(item)?),
        None => Err(AppError::Api(crate::error::ApiError::EmptyResponse {
            endpoint: endpoint.to_string(),
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_client() -> TrackingClient {
        let config = Config {
            mal_api_base_url: "https://mal.example.com/api/".to_string(),
            mal_username: "FridayFellows".to_string(),
            ..Config::default()
        };
        TrackingClient::new(&config).unwrap()
    }

    #[test]
    fn test_urls() {
        let client = create_test_client();
        assert_eq!(
            client.list_url(),
            "https://mal.example.com/api/animelist/FridayFellows"
        );
        assert_eq!(client.search_url(), "https://mal.example.com/api/anime/search");
        assert_eq!(
            client.write_url("update", 42),
            "https://mal.example.com/api/animelist/update/42"
        );
    }

    #[test]
    fn test_parse_search_body_object() {
        let info = parse_search_body("search", r#"{"id":"12345","title":"foobar","episodes":"13"}"#)
            .unwrap();
        assert_eq!(info.id, "12345");
        assert_eq!(info.episodes, "13");
    }

    #[test]
    fn test_parse_search_body_array_takes_first() {
        let info = parse_search_body(
            "search",
            r#"[{"id":"1","title":"first"},{"id":"2","title":"second"}]"#,
        )
        .unwrap();
        assert_eq!(info.title, "first");
    }

    #[test]
    fn test_parse_search_body_empty_is_error() {
        assert!(parse_search_body("search", "[]").is_err());
        assert!(parse_search_body("search", "null").is_err());
        assert!(parse_search_body("search", "not json").is_err());
    }

    #[test]
    fn test_list_response_shape() {
        let list: AnimeListResponse = serde_json::from_str(
            r#"{"myinfo":{"user_id":1},"anime":[{"series_animedb_id":"1","series_title":"A"}]}"#,
        )
        .unwrap();
        assert_eq!(list.anime.len(), 1);
        assert_eq!(list.anime[0].series_title, "A");
    }

    #[tokio::test]
    #[ignore] // 需要真实的追番服务账号
    async fn test_fetch_anime_list_live() {
        let _ = tracing_subscriber::fmt::try_init();
        let config = Config::from_env().unwrap();
        let client = TrackingClient::new(&config).unwrap();
        let list = client.fetch_anime_list().await.unwrap();
        println!("找到 {} 部番剧", list.len());
    }
}
