//! # 定宽 LRC 解析器
//!
//! 严格按字符位置读取 `[mm:ss.cc]` 时间戳，直接产出 `SentenceMap`。
//! 与 [`super::lrc_parser`] 的行为在边界情况上有所不同，两者各自保留。

use crate::converter::types::{SentenceMap, seeded_sentence_map};

/// 各数字位置及其对应的毫秒权重。
const DIGIT_WEIGHTS: [(usize, u64); 6] = [
    (1, 600_000),
    (2, 60_000),
    (4, 10_000),
    (5, 1_000),
    (7, 100),
    (8, 10),
];

/// 各分隔符的位置。
const SEPARATORS: [(usize, u8); 4] = [(0, b'['), (3, b':'), (6, b'.'), (9, b']')];

/// 按定宽规则解析 LRC 文本。
///
/// 输出总是包含 `0 → ""` 的哨兵条目。若解析后总条目数少于 2（即只有哨兵），
/// 视为什么都没解析出来，返回 `None`。
#[must_use]
pub fn parse_fixed_lrc(content: &str) -> Option<SentenceMap> {
    let mut map = seeded_sentence_map();

    for line in content.lines() {
        if let Some((ms, text)) = parse_fixed_line(line) {
            map.insert(ms, text.to_string());
        }
    }

    (map.len() >= 2).then_some(map)
}

fn parse_fixed_line(line: &str) -> Option<(u64, &str)> {
    let bytes = line.as_bytes();
    if bytes.len() < 10 {
        return None;
    }

    if SEPARATORS.iter().any(|&(pos, ch)| bytes[pos] != ch) {
        return None;
    }

    let mut ms = 0u64;
    for &(pos, weight) in &DIGIT_WEIGHTS {
        let byte = bytes[pos];
        if !byte.is_ascii_digit() {
            return None;
        }
        ms += u64::from(byte - b'0') * weight;
    }

    // 前 10 个字节都已确认是 ASCII，切片位置一定是字符边界。
    Some((ms, &line[10..]))
}
