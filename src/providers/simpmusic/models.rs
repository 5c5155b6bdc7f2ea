//! 此模块定义了用于反序列化 SimpMusic Lyrics API 响应的数据结构。

use serde::Deserialize;

use crate::model::track::Candidate;

/// 按视频 ID 查询接口的顶层响应结构。
#[derive(Debug, Deserialize)]
pub struct VideoLyricsResponse {
    /// 请求是否成功。部分错误响应不带此字段。
    #[serde(default)]
    pub success: Option<bool>,
    /// 该视频对应的全部歌词记录。
    #[serde(default)]
    pub data: Vec<SimpMusicLyric>,
}

/// 单条歌词记录。
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpMusicLyric {
    /// 记录 ID。
    #[serde(default)]
    pub id: Option<String>,
    /// 视频 ID。
    #[serde(default)]
    pub video_id: Option<String>,
    /// 歌曲名。
    #[serde(default)]
    pub song_title: String,
    /// 艺术家。
    #[serde(default)]
    pub artist_name: String,
    /// 专辑名。
    #[serde(default)]
    pub album_name: Option<String>,
    /// 时长（秒）。
    #[serde(default)]
    pub duration_seconds: Option<f64>,
    /// 纯文本歌词。
    #[serde(default)]
    pub plain_lyric: Option<String>,
    /// LRC 同步歌词。
    #[serde(default)]
    pub synced_lyrics: Option<String>,
}

impl From<SimpMusicLyric> for Candidate {
    fn from(lyric: SimpMusicLyric) -> Self {
        Self {
            id: lyric.id.or(lyric.video_id).unwrap_or_default(),
            title: lyric.song_title,
            artist: lyric.artist_name,
            album: lyric.album_name,
            duration: lyric.duration_seconds,
            plain_lyrics: lyric.plain_lyric,
            synced_lyrics: lyric.synced_lyrics,
        }
    }
}
