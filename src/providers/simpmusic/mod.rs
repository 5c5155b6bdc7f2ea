//! 此模块实现了与 SimpMusic Lyrics API 进行交互的 `VideoSearchProvider`。
//!
//! 该服务以 YouTube 视频 ID 为键存储社区提交的歌词，同一个视频可能对应多条记录。

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::{
    config::EndpointConfig,
    error::Result,
    model::track::Candidate,
    providers::{VideoSearchProvider, join_url, send_json},
};

pub mod models;
use models::VideoLyricsResponse;

/// SimpMusic Lyrics 客户端。
#[derive(Debug, Clone)]
pub struct SimpMusicClient {
    http_client: Client,
    base_url: String,
}

impl SimpMusicClient {
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

    fn build_url(&self, video_id: &str) -> String {
        join_url(
            &self.base_url,
            &format!("v1/{}", urlencoding::encode(video_id.trim())),
        )
    }
}

#[async_trait]
impl VideoSearchProvider for SimpMusicClient {
    fn name(&self) -> &'static str {
        "simpmusic"
    }

    async fn search_by_id(&self, video_id: &str) -> Result<Vec<Candidate>> {
        if video_id.trim().is_empty() {
            return Ok(Vec::new());
        }

        let url = self.build_url(video_id);
        debug!("[SimpMusic] 请求 {url}");

        let response: Option<VideoLyricsResponse> =
            send_json(self.http_client.get(&url), self.name()).await?;
        let data = response.map(|r| r.data).unwrap_or_default();

        debug!("[SimpMusic] 视频 {video_id} 共有 {} 条记录。", data.len());
        Ok(data.into_iter().map(Candidate::from).collect())
    }
}
