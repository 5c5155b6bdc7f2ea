//! 包含一些工具函数的模块。

/// 解析时间字符串为秒数。
///
/// 支持以下形式，每个分量都可以带小数：
/// * 纯秒数，例如 `"12.5"`（允许带 `s` 后缀，例如 `"12.5s"`）
/// * `mm:ss`，例如 `"1:02.30"`
/// * `hh:mm:ss`，例如 `"1:02:03.5"`
///
/// 无法解析时返回 `0.0`，不会报错。
#[must_use]
pub fn parse_time_str(time_str: &str) -> f64 {
    let trimmed = time_str.trim();
    let trimmed = trimmed.strip_suffix('s').unwrap_or(trimmed);

    let parts: Option<Vec<f64>> = trimmed
        .split(':')
        .map(|p| p.trim().parse::<f64>().ok())
        .collect();

    let seconds = match parts.as_deref() {
        Some([s]) => *s,
        Some([m, s]) => m * 60.0 + s,
        Some([h, m, s]) => h * 3600.0 + m * 60.0 + s,
        _ => return 0.0,
    };

    if seconds.is_finite() { seconds } else { 0.0 }
}

/// 将毫秒时间格式化为 LRC 时间戳 `[mm:ss.cc]`。
///
/// 百分秒由毫秒截断得到。分钟数超过 99 时按实际位数输出。
#[must_use]
pub fn format_lrc_timestamp(ms: u64) -> String {
    let minutes = ms / 60_000;
    let seconds = (ms % 60_000) / 1000;
    let centiseconds = (ms % 1000) / 10;
    format!("[{minutes:02}:{seconds:02}.{centiseconds:02}]")
}

/// 规范化文本中的空白字符
pub fn normalize_text_whitespace(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    trimmed.split_whitespace().collect::<Vec<&str>>().join(" ")
}
