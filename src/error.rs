//! 定义了整个 `lyrics-resolver` 库的错误类型 `LyricsResolverError`。

use std::io;
use thiserror::Error;

/// `lyrics-resolver` 库的通用错误枚举。
#[derive(Error, Debug)]
pub enum LyricsResolverError {
    /// 网络请求失败 (源自 `reqwest::Error`)
    #[error("网络请求失败: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// JSON 解析失败 (源自 `serde_json::Error`)
    #[error("JSON 解析失败: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// XML 解析失败 (源自 `quick_xml::Error`)
    #[error("XML 解析失败: {0}")]
    XmlParse(#[from] quick_xml::Error),

    /// I/O 错误 (源自 `io::Error`)
    #[error("I/O 错误: {0}")]
    Io(#[from] io::Error),

    /// 提供商返回了结果，但没有任何候选项满足匹配阈值
    #[error("提供商 '{0}' 没有满足匹配条件的结果")]
    NoMatch(String),

    /// 所有提供商均已尝试，仍未获得可用歌词
    #[error("歌词不可用")]
    Unavailable,

    /// 歌词文本结构无法解析
    #[error("歌词解析失败: {0}")]
    Parser(String),

    /// API 返回错误或空数据
    #[error("API 为 `{0}` 返回了错误或空数据")]
    ApiError(String),

    /// 请求的提供商未配置或已禁用
    #[error("提供商未配置: '{0}'")]
    ProviderNotConfigured(String),
}

impl LyricsResolverError {
    /// 该错误是否只表示"此提供商没有结果"，而不是传输或解析层面的故障。
    #[must_use]
    pub fn is_no_match(&self) -> bool {
        matches!(self, Self::NoMatch(_))
    }
}

/// `LyricsResolverError` 的 `Result` 类型别名，方便在函数签名中使用。
pub type Result<T> = std::result::Result<T, LyricsResolverError>;
