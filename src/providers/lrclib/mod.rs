//! 此模块实现了与 LRCLIB 进行交互的 `TrackSearchProvider`。
//!
//! LRCLIB 按标题、艺术家、专辑或自由文本搜索，返回的记录同时带有纯文本和 LRC 歌词。

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::{
    config::EndpointConfig,
    error::Result,
    model::track::{Candidate, SearchQuery},
    providers::{TrackSearchProvider, encode_query, join_url, send_json},
};

pub mod models;
use models::LrcLibTrack;

/// LRCLIB 客户端。
#[derive(Debug, Clone)]
pub struct LrcLibClient {
    http_client: Client,
    base_url: String,
}

impl LrcLibClient {
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

    /// 构建搜索接口的完整 URL。查询为空时返回 `None`。
    fn build_search_url(&self, query: &SearchQuery) -> Option<String> {
        let params = encode_query(&[
            ("q", query.q.as_deref()),
            ("track_name", query.title.as_deref()),
            ("artist_name", query.artist.as_deref()),
            ("album_name", query.album.as_deref()),
        ]);
        if params.is_empty() {
            return None;
        }
        Some(format!("{}?{params}", join_url(&self.base_url, "api/search")))
    }
}

#[async_trait]
impl TrackSearchProvider for LrcLibClient {
    fn name(&self) -> &'static str {
        "lrclib"
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<Candidate>> {
        let Some(url) = self.build_search_url(query) else {
            debug!("[LRCLIB] 查询为空，跳过请求。");
            return Ok(Vec::new());
        };

        debug!("[LRCLIB] 请求 {url}");
        let tracks: Vec<LrcLibTrack> = send_json(self.http_client.get(&url), self.name())
            .await?
            .unwrap_or_default();

        debug!("[LRCLIB] 返回 {} 条记录。", tracks.len());
        Ok(tracks.into_iter().map(Candidate::from).collect())
    }
}
