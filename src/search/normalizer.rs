//! 标题与艺术家的规范化。
//!
//! 播放器上报的标题常带有 "(Official Video)"、"[HD]"、"feat. X" 之类的噪声，
//! 艺术家常是多位艺术家拼接的字符串。这里把它们清理成适合搜索的形式。

use regex::Regex;
use std::sync::LazyLock;

/// 标题中常见的修饰关键词。
const QUALIFIER_KEYWORDS: &str = r"official|video|audio|lyrics?|hd|hq|4k|remaster(?:ed)?|live|remix|acoustic|edit|extended|radio|clean|explicit|version|mv|visualizer";

/// 包含修饰关键词的圆括号或方括号标注，例如 "(Official Video)"、"[HD]"
static BRACKETED_QUALIFIER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\s*[\(\[][^\)\]]*\b(?:{QUALIFIER_KEYWORDS})\b[^\)\]]*[\)\]]"
    ))
    .expect("未能编译 BRACKETED_QUALIFIER_REGEX")
});

/// 全角括号标注，例如 "【MV】"、"（中文版）"
static FULL_WIDTH_BRACKET_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*(?:【[^】]*】|（[^）]*）)").expect("未能编译 FULL_WIDTH_BRACKET_REGEX")
});

/// 竖线之后的后缀，例如 "Song | Channel Name"
static PIPE_SUFFIX_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\|.*$").expect("未能编译 PIPE_SUFFIX_REGEX"));

/// " - Official Video" 一类的结尾后缀
static DASH_QUALIFIER_SUFFIX_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\s+-\s+(?:{QUALIFIER_KEYWORDS})\b.*$"))
        .expect("未能编译 DASH_QUALIFIER_SUFFIX_REGEX")
});

/// 括号中的合作艺术家，例如 "(feat. X)"、"[ft. X]"
static BRACKETED_FEAT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*[\(\[](?:feat\.?|ft\.?|featuring)\s[^\)\]]*[\)\]]")
        .expect("未能编译 BRACKETED_FEAT_REGEX")
});

/// 结尾不带括号的合作艺术家，例如 "Song feat. X"
static FEAT_TAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s+(?:feat\.?|ft\.?|featuring)\s.*$").expect("未能编译 FEAT_TAIL_REGEX")
});

/// 多艺术家字符串中的分隔符，按优先级排列。
const ARTIST_SEPARATORS: [&str; 11] = [
    " & ",
    " and ",
    ", ",
    " x ",
    " X ",
    " feat. ",
    " feat ",
    " ft. ",
    " ft ",
    " featuring ",
    " with ",
];

/// 清理标题中的噪声标注。
///
/// 规则按固定顺序依次作用于整个字符串，结果再次去除首尾空白。
/// 对已经清理过的标题再次调用不会有任何变化。
#[must_use]
pub fn clean_title(title: &str) -> String {
    let rules: [&LazyLock<Regex>; 6] = [
        &BRACKETED_QUALIFIER_REGEX,
        &FULL_WIDTH_BRACKET_REGEX,
        &PIPE_SUFFIX_REGEX,
        &DASH_QUALIFIER_SUFFIX_REGEX,
        &BRACKETED_FEAT_REGEX,
        &FEAT_TAIL_REGEX,
    ];

    let mut cleaned = title.trim().to_string();
    for rule in rules {
        cleaned = rule.replace_all(&cleaned, "").into_owned();
    }
    cleaned.trim().to_string()
}

/// 从多艺术家字符串中提取主要艺术家。
///
/// 按 [`ARTIST_SEPARATORS`] 的顺序（忽略 ASCII 大小写）查找，
/// 在第一个出现的分隔符处截断；没有分隔符时返回去除首尾空白的原字符串。
#[must_use]
pub fn clean_artist(artist: &str) -> String {
    let trimmed = artist.trim();
    // ASCII 小写化不改变字节长度，下标可以直接用于原字符串。
    let lowered = trimmed.to_ascii_lowercase();

    ARTIST_SEPARATORS
        .iter()
        .find_map(|sep| lowered.find(&sep.to_ascii_lowercase()))
        .map_or_else(
            || trimmed.to_string(),
            |idx| trimmed[..idx].trim().to_string(),
        )
}
