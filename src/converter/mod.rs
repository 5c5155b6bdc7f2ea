//! 歌词转换器核心模块
//!
//! 将三种歌词编码（纯文本、逐行同步的 LRC、逐字同步的 TTML）统一为
//! [`StructuredLyrics`]，并能将其写回 LRC。

pub mod generators;
pub mod parsers;
pub mod types;
pub mod utils;

pub use generators::lrc_generator::{generate_lrc, generate_lrc_with_words};
pub use parsers::{
    fixed_lrc_parser::parse_fixed_lrc,
    lrc_parser::parse_lrc,
    plain_parser::{detect_format, parse_lyrics},
    ttml_parser::{parse_ttml, try_parse_ttml, ttml_to_lrc},
};
pub use types::{Line, LyricFormat, SentenceMap, StructuredLyrics, Word};
