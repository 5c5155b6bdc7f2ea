//! LRC 格式生成器

use crate::converter::{types::Line, utils::format_lrc_timestamp};

/// 将歌词行序列化为 LRC 文本。
///
/// 每行输出为 `[mm:ss.cc]文本`，按输入顺序，以 `\n` 分隔，末尾不带换行。
/// 时间戳由开始时间截断到整毫秒后再截断到百分秒得到。
#[must_use]
pub fn generate_lrc(lines: &[Line]) -> String {
    lines
        .iter()
        .map(write_main_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// 将歌词行序列化为 LRC 文本，并在每个带逐字时间的行下方追加辅助行。
///
/// 辅助行格式为 `<词:开始:结束|词:开始:结束|...>`，时间以秒为单位。
#[must_use]
pub fn generate_lrc_with_words(lines: &[Line]) -> String {
    let mut output: Vec<String> = Vec::with_capacity(lines.len() * 2);
    for line in lines {
        output.push(write_main_line(line));
        if !line.words.is_empty() {
            output.push(write_word_timing_line(line));
        }
    }
    output.join("\n")
}

fn write_main_line(line: &Line) -> String {
    format!("{}{}", format_lrc_timestamp(line.start_ms()), line.text)
}

fn write_word_timing_line(line: &Line) -> String {
    let triples = line
        .words
        .iter()
        .map(|w| format!("{}:{}:{}", w.text, w.start_time, w.end_time))
        .collect::<Vec<_>>()
        .join("|");
    format!("<{triples}>")
}
