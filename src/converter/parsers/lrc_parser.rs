//! # LRC 格式解析器
//!
//! 宽容的逐行同步歌词解析器。每行需要以 `[mm:ss.cc]` 或 `[mm:ss.ccc]` 开头，
//! 不符合格式的行会被静默跳过。
//!
//! 紧跟在歌词行下方、形如 `<词:开始:结束|词:开始:结束|...>` 的辅助行会被读回为
//! 该行的逐字时间，这是 [`crate::converter::generators::lrc_generator`] 写出的扩展格式。

use regex::Regex;
use std::sync::LazyLock;
use tracing::trace;

use crate::converter::types::{Line, StructuredLyrics, Word};

/// 匹配一个完整的 LRC 歌词行，捕获分、秒、小数部分和文本部分
static LRC_LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[(\d{2,}):(\d{2})\.(\d{2,3})\](.*)$").expect("未能编译 LRC_LINE_REGEX")
});

/// 在任意位置查找一个 LRC 时间戳
static LRC_TIMESTAMP_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\d{2,}:\d{2}\.\d{2,3}\]").expect("未能编译 LRC_TIMESTAMP_REGEX")
});

/// 一行 LRC 的最短长度，即 `[mm:ss.cc]` 本身的长度。
const MIN_LINE_LEN: usize = 10;

/// 文本中是否在任意位置出现 LRC 时间戳。
#[must_use]
pub fn has_lrc_timestamp(content: &str) -> bool {
    LRC_TIMESTAMP_REGEX.is_match(content)
}

/// 解析 LRC 文本。
///
/// 行的顺序保持输入顺序，不会重新排序。
///
/// # 参数
/// * `content` - LRC 文本。
///
/// # 返回
/// 结构化歌词。只要解析出至少一行，`is_synced` 即为 `true`。
#[must_use]
pub fn parse_lrc(content: &str) -> StructuredLyrics {
    let mut lines: Vec<Line> = Vec::new();

    for raw_line in content.lines() {
        if let Some(words) = parse_word_timing_line(raw_line) {
            if let Some(last) = lines.last_mut() {
                last.words = words;
            }
            continue;
        }

        if raw_line.len() < MIN_LINE_LEN {
            continue;
        }

        let Some(caps) = LRC_LINE_REGEX.captures(raw_line) else {
            trace!("[LRC] 跳过无法识别的行: {raw_line}");
            continue;
        };

        let minutes = caps.get(1).map_or("0", |m| m.as_str());
        let seconds = caps.get(2).map_or("0", |m| m.as_str());
        let fraction = caps.get(3).map_or("0", |m| m.as_str());
        let text = caps.get(4).map_or("", |m| m.as_str()).trim();

        let (Ok(minutes), Ok(seconds), Ok(fraction_value)) = (
            minutes.parse::<u64>(),
            seconds.parse::<u64>(),
            fraction.parse::<u64>(),
        ) else {
            continue;
        };

        let start_time = (minutes * 60 + seconds) as f64
            + fraction_value as f64 / 10f64.powi(fraction.len() as i32);

        lines.push(Line::new(text, start_time));
    }

    StructuredLyrics {
        raw: content.to_string(),
        is_synced: !lines.is_empty(),
        lines,
    }
}

/// 尝试把一行解析为逐字时间辅助行。
///
/// 不是辅助行时返回 `None`。格式错误的三元组会被跳过。
fn parse_word_timing_line(line: &str) -> Option<Vec<Word>> {
    let inner = line.trim().strip_prefix('<')?.strip_suffix('>')?;

    let words = inner
        .split('|')
        .filter_map(|entry| {
            let mut parts = entry.rsplitn(3, ':');
            let end = parts.next()?.trim().parse::<f64>().ok()?;
            let start = parts.next()?.trim().parse::<f64>().ok()?;
            let text = parts.next()?;
            Some(Word {
                text: text.to_string(),
                start_time: start,
                end_time: end,
            })
        })
        .collect();

    Some(words)
}
