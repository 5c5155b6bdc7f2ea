//! 歌词解析器模块

pub mod fixed_lrc_parser;
pub mod lrc_parser;
pub mod plain_parser;
pub mod ttml_parser;
