//! 提供商模块
//!
//! 该模块定义了解析器与歌词提供商交互的三种抽象，以及它们基于 HTTP 的实现。

use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{
    error::{LyricsResolverError, Result},
    model::track::{Candidate, MarkupQuery, SearchQuery},
};

pub mod better_lyrics;
pub mod lrclib;
pub mod simpmusic;

/// 按名称/时长搜索的提供商。
#[async_trait]
pub trait TrackSearchProvider: Send + Sync {
    ///
    /// 返回提供商的唯一名称。
    ///
    /// 一个全小写的静态字符串，例如 `"lrclib"`。
    ///
    fn name(&self) -> &'static str;

    ///
    /// 根据标题、艺术家、专辑或自由文本查询搜索曲目。
    ///
    /// # 参数
    /// * `query` - 搜索条件，具体填写哪些字段由调用方的搜索策略决定。
    ///
    /// # 返回
    /// 一个 `Result`，成功时包含提供商返回的全部候选项（可能为空）。
    ///
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Candidate>>;
}

/// 按视频 ID 搜索的提供商。
#[async_trait]
pub trait VideoSearchProvider: Send + Sync {
    /// 返回提供商的唯一名称。
    fn name(&self) -> &'static str;

    ///
    /// 根据视频 ID 获取该视频对应的候选项。
    ///
    /// # 参数
    /// * `video_id` - 视频平台上的 ID。
    ///
    async fn search_by_id(&self, video_id: &str) -> Result<Vec<Candidate>>;
}

/// 提供逐字 TTML 歌词的提供商。
#[async_trait]
pub trait MarkupProvider: Send + Sync {
    /// 返回提供商的唯一名称。
    fn name(&self) -> &'static str;

    ///
    /// 获取 TTML 标记。
    ///
    /// # 返回
    /// 找到时为 `Some(标记文本)`，提供商没有该曲目时为 `None`。
    ///
    async fn fetch_markup(&self, query: &MarkupQuery) -> Result<Option<String>>;
}

/// 发送请求并把成功响应反序列化为 JSON。
///
/// HTTP 404 视为"没有结果"，返回 `Ok(None)`；其他非成功状态返回 `ApiError`。
pub(crate) async fn send_json<T: DeserializeOwned>(
    request: RequestBuilder,
    provider: &str,
) -> Result<Option<T>> {
    let response = request.send().await?;
    let status = response.status();

    if status == StatusCode::NOT_FOUND {
        debug!("[{provider}] 服务器返回 404，视为没有结果。");
        return Ok(None);
    }
    if !status.is_success() {
        return Err(LyricsResolverError::ApiError(format!(
            "{provider} (HTTP {status})"
        )));
    }

    Ok(Some(response.json::<T>().await?))
}

/// 把基础地址与路径拼接起来，去掉基础地址多余的结尾斜杠。
pub(crate) fn join_url(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// 把非空的参数编码为查询字符串。
pub(crate) fn encode_query(params: &[(&str, Option<&str>)]) -> String {
    params
        .iter()
        .filter_map(|(key, value)| {
            value
                .filter(|v| !v.trim().is_empty())
                .map(|v| format!("{key}={}", urlencoding::encode(v)))
        })
        .collect::<Vec<_>>()
        .join("&")
}
