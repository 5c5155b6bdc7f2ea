//! 定义了歌词转换中使用的核心数据类型。

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

//=============================================================================
// 1. 歌词格式枚举
//=============================================================================

/// 枚举：表示支持的歌词格式。
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LyricFormat {
    /// 不带时间戳的纯文本歌词。
    Plain,
    /// 标准 LRC (`LyRiCs`) 格式，可能带有逐字时间的辅助行。
    #[default]
    Lrc,
    /// `Timed Text Markup Language` 格式。
    Ttml,
}

impl LyricFormat {
    /// 将歌词格式枚举转换为对应的文件扩展名字符串。
    #[must_use]
    pub fn to_extension_str(self) -> &'static str {
        match self {
            LyricFormat::Plain => "txt",
            LyricFormat::Lrc => "lrc",
            LyricFormat::Ttml => "ttml",
        }
    }
}

impl fmt::Display for LyricFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LyricFormat::Plain => write!(f, "Plain"),
            LyricFormat::Lrc => write!(f, "LRC"),
            LyricFormat::Ttml => write!(f, "TTML"),
        }
    }
}

//=============================================================================
// 2. 歌词内部表示结构
//=============================================================================

/// 一个带时间的单词。时间均为秒。
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    /// 单词文本
    pub text: String,
    /// 开始时间（秒）
    pub start_time: f64,
    /// 结束时间（秒）
    pub end_time: f64,
}

/// 歌词行。
///
/// 同一份歌词中各行的开始时间按构造顺序单调不减，但不会被校验或重新排序。
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// 行文本
    pub text: String,
    /// 开始时间（秒）
    pub start_time: f64,
    /// 逐字时间，逐行同步的歌词为空
    pub words: Vec<Word>,
}

impl Line {
    /// 创建一个不带逐字时间的行。
    pub fn new(text: impl Into<String>, start_time: f64) -> Self {
        Self {
            text: text.into(),
            start_time,
            words: Vec::new(),
        }
    }

    /// 开始时间，截断为整毫秒。
    #[must_use]
    pub fn start_ms(&self) -> u64 {
        seconds_to_ms(self.start_time)
    }
}

/// 从时间戳（毫秒）到该时刻开始的行文本的映射。
///
/// 总是包含一个 `0 → ""` 的哨兵条目，表示"歌词尚未开始"。
pub type SentenceMap = BTreeMap<u64, String>;

/// 创建一个只含哨兵条目的 `SentenceMap`。
#[must_use]
pub fn seeded_sentence_map() -> SentenceMap {
    let mut map = SentenceMap::new();
    map.insert(0, String::new());
    map
}

/// 统一的结构化歌词。由解析器一次性构造，之后不再修改。
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredLyrics {
    /// 原始源文本
    pub raw: String,
    /// 按时间顺序排列的歌词行
    pub lines: Vec<Line>,
    /// 是否带时间同步
    pub is_synced: bool,
}

impl StructuredLyrics {
    /// 是否至少有一行带有逐字时间。
    #[must_use]
    pub fn has_word_timing(&self) -> bool {
        self.lines.iter().any(|l| !l.words.is_empty())
    }

    /// 转换为兼容旧接口的 `SentenceMap` 视图。
    ///
    /// 同一毫秒上的多行以后出现者为准。
    #[must_use]
    pub fn to_sentence_map(&self) -> SentenceMap {
        let mut map = seeded_sentence_map();
        for line in &self.lines {
            map.insert(line.start_ms(), line.text.clone());
        }
        map
    }
}

/// 将秒转换为整毫秒，向零截断，负数视为 0。
#[must_use]
pub fn seconds_to_ms(seconds: f64) -> u64 {
    (seconds * 1000.0) as u64
}
