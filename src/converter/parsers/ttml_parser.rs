//! # TTML 逐字歌词解析器
//!
//! 从 TTML 标记中提取逐字时间：
//!
//! * 每个带 `begin` 属性的 `<p>` 产生一行，没有 `begin` 的 `<p>` 被忽略。
//! * `<p>` 的直接子级 `<span>` 若同时带有 `begin` 和 `end` 且文本非空，则记为一个片段。
//! * 紧随片段之后的兄弟节点若是包含空白的文本节点，则该片段"带尾随空格"。
//! * 不带尾随空格的片段与下一个片段合并成同一个词（音节延续），带尾随空格的片段结束当前词。
//! * 行文本是各词以单个空格连接的结果；没有任何片段时，退回到 `<p>` 的完整文本。
//! * 文本为空的行被丢弃。
//!
//! 标记中任何位置出现解析错误（包括文档在元素闭合前就结束），都会得到空的行列表，
//! 而不是部分结果。

use std::borrow::Cow;

use quick_xml::{
    Reader,
    errors::IllFormedError,
    escape::unescape,
    events::{BytesStart, Event},
};
use tracing::warn;

use crate::{
    converter::{
        generators::lrc_generator::generate_lrc_with_words,
        types::{Line, StructuredLyrics, Word},
        utils::{normalize_text_whitespace, parse_time_str},
    },
    error::Result,
};

/// 一个带时间的 `<span>` 片段。
#[derive(Debug)]
struct TimedSpan {
    text: String,
    begin: f64,
    end: f64,
    trailing_space: bool,
}

/// 正在构建的 `<span>`。
#[derive(Debug)]
struct OpenSpan {
    begin: Option<f64>,
    end: Option<f64>,
    text: String,
}

/// 正在构建的 `<p>`。
#[derive(Debug)]
struct OpenParagraph {
    depth: usize,
    begin: f64,
    full_text: String,
    spans: Vec<TimedSpan>,
    open_span: Option<OpenSpan>,
    /// 刚结束的片段在 `spans` 中的下标；下一个兄弟节点若是文本，会更新它的尾随空格标志。
    pending_sibling: Option<usize>,
}

impl OpenParagraph {
    fn push_text(&mut self, depth: usize, text: &str) {
        self.full_text.push_str(text);

        if let Some(span) = self.open_span.as_mut() {
            span.text.push_str(text);
        } else if depth == self.depth
            && let Some(idx) = self.pending_sibling
            && text.chars().any(char::is_whitespace)
        {
            self.spans[idx].trailing_space = true;
        }
    }

    fn close_span(&mut self) {
        let Some(open) = self.open_span.take() else {
            return;
        };
        let (Some(begin), Some(end)) = (open.begin, open.end) else {
            return;
        };
        let text = open.text.trim();
        if text.is_empty() {
            return;
        }
        self.spans.push(TimedSpan {
            text: text.to_string(),
            begin,
            end,
            trailing_space: false,
        });
        self.pending_sibling = Some(self.spans.len() - 1);
    }

    fn into_line(self) -> Option<Line> {
        let words = merge_spans(self.spans);
        let text = if words.is_empty() {
            normalize_text_whitespace(&self.full_text)
        } else {
            words
                .iter()
                .map(|w| w.text.as_str())
                .collect::<Vec<_>>()
                .join(" ")
        };

        if text.is_empty() {
            return None;
        }

        Some(Line {
            text,
            start_time: self.begin,
            words,
        })
    }
}

/// 按尾随空格规则把片段合并为词。
fn merge_spans(spans: Vec<TimedSpan>) -> Vec<Word> {
    let mut words: Vec<Word> = Vec::new();
    let mut current: Option<Word> = None;

    for span in spans {
        match current.as_mut() {
            Some(word) => {
                word.text.push_str(&span.text);
                word.end_time = span.end;
            }
            None => {
                current = Some(Word {
                    text: span.text,
                    start_time: span.begin,
                    end_time: span.end,
                });
            }
        }

        if span.trailing_space
            && let Some(word) = current.take()
        {
            words.push(word);
        }
    }

    if let Some(word) = current {
        words.push(word);
    }

    words
}

/// 读取元素上的时间属性。
fn time_attribute(element: &BytesStart<'_>, name: &[u8]) -> Option<f64> {
    element
        .attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == name)
        .map(|attr| parse_time_str(&String::from_utf8_lossy(&attr.value)))
}

fn decode_text(raw: &[u8]) -> String {
    let text = String::from_utf8_lossy(raw);
    unescape(&text)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| text.to_string())
}

fn decode_entity(name: &[u8]) -> String {
    let reference = format!("&{};", String::from_utf8_lossy(name));
    unescape(&reference)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| reference.clone())
}

/// 逐个读取 XML 事件，得到所有行。遇到任何错误立即返回。
///
/// 文档结束时仍有未闭合的元素，视为缺少结束标签。
fn read_lines(markup: &str) -> std::result::Result<Vec<Line>, quick_xml::Error> {
    let mut reader = Reader::from_str(markup);
    reader.config_mut().trim_text(false);

    let mut lines = Vec::new();
    let mut open_elements: Vec<String> = Vec::new();
    let mut paragraph: Option<OpenParagraph> = None;

    loop {
        let depth = open_elements.len();
        match reader.read_event()? {
            Event::Start(e) => {
                open_elements.push(String::from_utf8_lossy(e.name().as_ref()).into_owned());
                let depth = depth + 1;
                let is_p = e.local_name().as_ref() == b"p";
                let is_span = e.local_name().as_ref() == b"span";

                match paragraph.as_mut() {
                    None if is_p => {
                        if let Some(begin) = time_attribute(&e, b"begin") {
                            paragraph = Some(OpenParagraph {
                                depth,
                                begin,
                                full_text: String::new(),
                                spans: Vec::new(),
                                open_span: None,
                                pending_sibling: None,
                            });
                        }
                    }
                    Some(p) if depth == p.depth + 1 => {
                        p.pending_sibling = None;
                        if is_span {
                            p.open_span = Some(OpenSpan {
                                begin: time_attribute(&e, b"begin"),
                                end: time_attribute(&e, b"end"),
                                text: String::new(),
                            });
                        }
                    }
                    _ => {}
                }
            }
            Event::Empty(_) => {
                if let Some(p) = paragraph.as_mut()
                    && depth == p.depth
                {
                    p.pending_sibling = None;
                }
            }
            Event::End(_) => {
                match paragraph.as_ref().map(|p| p.depth) {
                    Some(p_depth) if depth == p_depth + 1 => {
                        if let Some(p) = paragraph.as_mut() {
                            p.close_span();
                        }
                    }
                    Some(p_depth) if depth == p_depth => {
                        if let Some(line) = paragraph.take().and_then(OpenParagraph::into_line) {
                            lines.push(line);
                        }
                    }
                    _ => {}
                }
                open_elements.pop();
            }
            Event::Text(t) => {
                if let Some(p) = paragraph.as_mut() {
                    p.push_text(depth, &decode_text(&t));
                }
            }
            Event::CData(t) => {
                if let Some(p) = paragraph.as_mut() {
                    p.push_text(depth, &String::from_utf8_lossy(&t));
                }
            }
            Event::GeneralRef(r) => {
                if let Some(p) = paragraph.as_mut() {
                    p.push_text(depth, &decode_entity(&r));
                }
            }
            Event::Eof => {
                if let Some(name) = open_elements.pop() {
                    return Err(quick_xml::Error::IllFormed(IllFormedError::MissingEndTag(
                        name,
                    )));
                }
                break;
            }
            _ => {}
        }
    }

    Ok(lines)
}

/// 解析 TTML 逐字歌词，标记有误时返回 [`LyricsResolverError::XmlParse`](crate::error::LyricsResolverError::XmlParse)。
pub fn try_parse_ttml(markup: &str) -> Result<StructuredLyrics> {
    let lines = read_lines(markup)?;

    Ok(StructuredLyrics {
        raw: markup.to_string(),
        lines,
        is_synced: true,
    })
}

/// 解析 TTML 逐字歌词。
///
/// # 参数
/// * `markup` - TTML 文本。
///
/// # 返回
/// 结构化歌词，`is_synced` 恒为 `true`，`raw` 为原始标记。
/// 标记无法解析时 `lines` 为空。
#[must_use]
pub fn parse_ttml(markup: &str) -> StructuredLyrics {
    try_parse_ttml(markup).unwrap_or_else(|e| {
        warn!("[TTML] 解析 TTML 失败，丢弃全部内容: {e}");
        StructuredLyrics {
            raw: markup.to_string(),
            lines: Vec::new(),
            is_synced: true,
        }
    })
}

/// 将 TTML 转换为带逐字辅助行的 LRC 文本。
#[must_use]
pub fn ttml_to_lrc(markup: &str) -> String {
    generate_lrc_with_words(&parse_ttml(markup).lines)
}
