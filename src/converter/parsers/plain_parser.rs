//! # 纯文本歌词解析与格式自动识别

use crate::converter::{
    parsers::lrc_parser::{has_lrc_timestamp, parse_lrc},
    types::{Line, LyricFormat, StructuredLyrics},
};

/// 识别歌词文本的格式。
///
/// 只要任意一行带有 LRC 时间戳，即视为 LRC，否则视为纯文本。
#[must_use]
pub fn detect_format(content: &str) -> LyricFormat {
    if has_lrc_timestamp(content) {
        LyricFormat::Lrc
    } else {
        LyricFormat::Plain
    }
}

/// 解析纯文本歌词：每个输入行对应一个开始时间为 0 的 `Line`。
#[must_use]
pub fn parse_plain(content: &str) -> StructuredLyrics {
    StructuredLyrics {
        raw: content.to_string(),
        lines: content.lines().map(|l| Line::new(l.trim(), 0.0)).collect(),
        is_synced: false,
    }
}

/// 自动识别格式并解析提供商返回的歌词文本。
#[must_use]
pub fn parse_lyrics(content: &str) -> StructuredLyrics {
    match detect_format(content) {
        LyricFormat::Lrc => parse_lrc(content),
        LyricFormat::Plain | LyricFormat::Ttml => parse_plain(content),
    }
}
