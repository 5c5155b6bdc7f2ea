//! 歌词生成器模块

pub mod lrc_generator;
