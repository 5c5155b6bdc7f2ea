//! 基于编辑距离的模糊字符串比较。

use strsim::levenshtein;

/// 一个字符串包含另一个字符串时给出的固定分数。
pub const CONTAINMENT_SCORE: f64 = 0.8;

/// 两个字符串之间的 Levenshtein 编辑距离（按字符计算，插入、删除、替换代价均为 1）。
#[must_use]
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    levenshtein(a, b)
}

/// 计算两个字符串的相似度，范围为 `[0, 1]`。
///
/// 两个输入先转为小写并去除首尾空白，然后：
/// * 相等时为 `1.0`；
/// * 任意一个为空时为 `0.0`；
/// * 一个包含另一个时为 [`CONTAINMENT_SCORE`]；
/// * 否则为 `1 - 编辑距离 / 较长字符串的字符数`。
#[must_use]
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();

    if a == b {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a.contains(&b) || b.contains(&a) {
        return CONTAINMENT_SCORE;
    }

    let max_len = a.chars().count().max(b.chars().count());
    1.0 - levenshtein_distance(&a, &b) as f64 / max_len as f64
}
