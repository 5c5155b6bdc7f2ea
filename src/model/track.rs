//! 定义了与歌词查询相关的核心数据结构，包括查询输入、提供商候选项和解析结果。

use serde::{Deserialize, Serialize};

use crate::{converter::types::StructuredLyrics, error::Result};

/// 代表一次歌词解析请求。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LyricsQuery {
    /// 歌曲标题。
    pub title: String,
    /// 艺术家（可能包含多位艺术家）。
    pub artist: String,
    /// 专辑名。
    pub album: Option<String>,
    /// 歌曲时长（秒）。`None` 表示时长未知。
    pub duration: Option<u32>,
    /// 视频 ID，用于按 ID 搜索的提供商。
    pub video_id: Option<String>,
}

impl LyricsQuery {
    /// 用标题和艺术家创建一个查询。
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            ..Default::default()
        }
    }

    /// 设置时长（秒）。负数（例如 `-1`）表示时长未知。
    #[must_use]
    pub fn with_duration_secs(mut self, duration: i64) -> Self {
        self.duration = u32::try_from(duration).ok();
        self
    }

    /// 设置专辑名。
    #[must_use]
    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = Some(album.into());
        self
    }

    /// 设置视频 ID。
    #[must_use]
    pub fn with_video_id(mut self, video_id: impl Into<String>) -> Self {
        self.video_id = Some(video_id.into());
        self
    }
}

/// 发送给按名称/时长搜索的提供商的查询。
///
/// 所有字段都是可选的，具体使用哪些字段由搜索策略决定。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    /// 歌曲标题。
    pub title: Option<String>,
    /// 艺术家。
    pub artist: Option<String>,
    /// 专辑名。
    pub album: Option<String>,
    /// 自由文本查询。
    pub q: Option<String>,
}

/// 发送给逐字歌词提供商的查询。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkupQuery {
    /// 歌曲标题。
    pub title: String,
    /// 艺术家。
    pub artist: String,
    /// 歌曲时长（秒）。
    pub duration: Option<u32>,
    /// 专辑名。
    pub album: Option<String>,
}

/// 提供商报告的一条曲目记录。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// 在提供商平台上的 ID。
    pub id: String,
    /// 歌曲标题。
    pub title: String,
    /// 艺术家。
    pub artist: String,
    /// 专辑名。
    pub album: Option<String>,
    /// 时长（秒），可能缺失或为零。
    pub duration: Option<f64>,
    /// 纯文本歌词。
    pub plain_lyrics: Option<String>,
    /// 逐行同步的 LRC 歌词。
    pub synced_lyrics: Option<String>,
}

fn non_blank(text: &Option<String>) -> Option<&str> {
    text.as_deref().filter(|t| !t.trim().is_empty())
}

impl Candidate {
    /// 是否带有任意形式的歌词。
    #[must_use]
    pub fn has_lyrics(&self) -> bool {
        self.plain_text().is_some() || self.synced_text().is_some()
    }

    /// 是否带有逐行同步歌词。
    #[must_use]
    pub fn has_synced_lyrics(&self) -> bool {
        self.synced_text().is_some()
    }

    /// 非空的同步歌词文本。
    #[must_use]
    pub fn synced_text(&self) -> Option<&str> {
        non_blank(&self.synced_lyrics)
    }

    /// 非空的纯文本歌词。
    #[must_use]
    pub fn plain_text(&self) -> Option<&str> {
        non_blank(&self.plain_lyrics)
    }

    /// 最佳歌词：优先同步歌词，否则纯文本歌词。
    #[must_use]
    pub fn best_lyrics(&self) -> Option<&str> {
        self.synced_text().or_else(|| self.plain_text())
    }

    /// 时长（秒），缺失时视为 0。
    #[must_use]
    pub fn duration_secs(&self) -> f64 {
        self.duration.unwrap_or(0.0)
    }
}

/// 一条已解析的歌词结果及其来源。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LyricsResult {
    /// 提供该歌词的提供商名称。
    pub provider_name: String,
    /// 以交换格式表示的歌词文本（LRC 或纯文本）。
    pub text: String,
    /// 结构化歌词。
    pub parsed: StructuredLyrics,
}

/// 对单个提供商的一次尝试的结果。
#[derive(Debug)]
pub struct MatchResult {
    /// 提供商名称。
    pub provider_name: &'static str,
    /// 成功时为歌词结果，失败时为对应错误。
    pub outcome: Result<LyricsResult>,
}

impl MatchResult {
    /// 这次尝试是否成功。
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}
