//! 此模块实现了与 BetterLyrics API 进行交互的 `MarkupProvider`。
//!
//! 该服务按标题、艺术家、时长和专辑返回逐字同步的 TTML 歌词。

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::{
    config::EndpointConfig,
    error::Result,
    model::track::MarkupQuery,
    providers::{MarkupProvider, encode_query, join_url, send_json},
};

pub mod models;
use models::GetLyricsResponse;

/// BetterLyrics 客户端。
#[derive(Debug, Clone)]
pub struct BetterLyricsClient {
    http_client: Client,
    base_url: String,
}

impl BetterLyricsClient {
    /// 使用共享的 HTTP 客户端和 API 基础地址创建实例。
    pub fn new(http_client: Client, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
        }
    }

    /// 根据端点配置创建实例。
    pub fn from_config(http_client: Client, endpoint: &EndpointConfig) -> Self {
        Self::new(http_client, endpoint.base_url.clone())
    }

    fn build_url(&self, query: &MarkupQuery) -> String {
        let duration = query.duration.map(|d| d.to_string());
        let params = encode_query(&[
            ("s", Some(query.title.as_str())),
            ("a", Some(query.artist.as_str())),
            ("d", duration.as_deref()),
            ("al", query.album.as_deref()),
        ]);
        format!("{}?{params}", join_url(&self.base_url, "getLyrics"))
    }
}

#[async_trait]
impl MarkupProvider for BetterLyricsClient {
    fn name(&self) -> &'static str {
        "better-lyrics"
    }

    async fn fetch_markup(&self, query: &MarkupQuery) -> Result<Option<String>> {
        let url = self.build_url(query);
        debug!("[BetterLyrics] 请求 {url}");

        let response: Option<GetLyricsResponse> =
            send_json(self.http_client.get(&url), self.name()).await?;
        Ok(response.and_then(GetLyricsResponse::into_markup))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url() {
        let client = BetterLyricsClient::new(Client::new(), "https://lyrics-api.boidu.dev");
        let query = MarkupQuery {
            title: "Shape of You".to_string(),
            artist: "Ed Sheeran".to_string(),
            duration: Some(233),
            album: None,
        };
        assert_eq!(
            client.build_url(&query),
            "https://lyrics-api.boidu.dev/getLyrics?s=Shape%20of%20You&a=Ed%20Sheeran&d=233"
        );
    }

    #[tokio::test]
    #[ignore]
    async fn test_fetch_markup_live() {
        let client = BetterLyricsClient::new(Client::new(), "https://lyrics-api.boidu.dev");
        let query = MarkupQuery {
            title: "Shape of You".to_string(),
            artist: "Ed Sheeran".to_string(),
            duration: Some(233),
            album: None,
        };
        let markup = client.fetch_markup(&query).await.unwrap();

        assert!(markup.is_some_and(|m| m.contains("<tt")), "应返回 TTML 标记");
    }
}
