//! 此模块定义了用于反序列化 LRCLIB API 响应的数据结构。
//! API 文档见 <https://lrclib.net/docs>

use serde::Deserialize;

use crate::model::track::Candidate;

// =================================================================
// 搜索接口 (`/api/search`) 的模型
// =================================================================

/// 搜索接口返回数组中的单条记录。
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LrcLibTrack {
    /// 记录 ID。
    pub id: i64,
    /// 歌曲名。
    #[serde(default)]
    pub track_name: String,
    /// 艺术家。
    #[serde(default)]
    pub artist_name: String,
    /// 专辑名。
    pub album_name: Option<String>,
    /// 时长（秒）。
    pub duration: Option<f64>,
    /// 是否为纯音乐。
    #[serde(default)]
    pub instrumental: bool,
    /// 纯文本歌词。
    pub plain_lyrics: Option<String>,
    /// LRC 同步歌词。
    pub synced_lyrics: Option<String>,
}

impl From<LrcLibTrack> for Candidate {
    fn from(track: LrcLibTrack) -> Self {
        Self {
            id: track.id.to_string(),
            title: track.track_name,
            artist: track.artist_name,
            album: track.album_name,
            duration: track.duration,
            plain_lyrics: track.plain_lyrics,
            synced_lyrics: track.synced_lyrics,
        }
    }
}
