//! 此模块定义了用于反序列化 BetterLyrics API 响应的数据结构。

use serde::Deserialize;

/// `/getLyrics` 接口的响应。
#[derive(Debug, Deserialize)]
pub struct GetLyricsResponse {
    /// TTML 标记文本。
    #[serde(default)]
    pub ttml: Option<String>,
}

impl GetLyricsResponse {
    /// 非空的 TTML 文本。
    pub fn into_markup(self) -> Option<String> {
        self.ttml.filter(|t| !t.trim().is_empty())
    }
}
