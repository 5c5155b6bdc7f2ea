//! 用于演示 `lyrics-resolver` 库的核心功能。
//!
//! ## 如何运行
//!
//! ```bash
//! cargo run --package lyrics_resolver_rs --example demo -- "Blinding Lights" "The Weeknd" 200
//! ```
//!
//! 第四个参数可选，为 YouTube 视频 ID。

use lyrics_resolver_rs::{
    LyricsResolver,
    config::{load_config, save_config},
    converter::{LyricFormat, generate_lrc},
    error::Result,
    model::track::LyricsQuery,
};

use tracing::{Level, error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let mut args = std::env::args().skip(1);
    let title = args.next().unwrap_or_else(|| "Blinding Lights".to_string());
    let artist = args.next().unwrap_or_else(|| "The Weeknd".to_string());
    let duration = args
        .next()
        .and_then(|d| d.parse::<i64>().ok())
        .unwrap_or(-1);

    let mut query = LyricsQuery::new(title, artist).with_duration_secs(duration);
    if let Some(video_id) = args.next() {
        query = query.with_video_id(video_id);
    }

    info!("正在初始化...");
    let config = load_config()?;
    // 写回一次，方便用户在配置目录中找到并修改默认配置。
    if let Err(e) = save_config(&config) {
        warn!("保存配置失败: {}", e);
    }
    let resolver = LyricsResolver::from_config(config)?;

    info!(
        "准备解析歌曲: '{}' - '{}' (时长: {:?})",
        query.title, query.artist, query.duration
    );

    match resolver.get_lyrics_with_source(&query).await {
        Ok(result) => {
            // 标记提供商的结果保留原始 TTML，可直接另存。
            let format = if result.parsed.raw.trim_start().starts_with('<') {
                LyricFormat::Ttml
            } else if result.parsed.is_synced {
                LyricFormat::Lrc
            } else {
                LyricFormat::Plain
            };
            info!(
                "从 '{}' 获取歌词成功，格式 {}，共 {} 行。",
                result.provider_name,
                format,
                result.parsed.lines.len()
            );

            for (ms, text) in result.parsed.to_sentence_map().iter().take(10) {
                println!("  {:>7} ms | {}", ms, text);
            }

            let output_filename = format!("lyrics.{}", format.to_extension_str());
            let output = match format {
                LyricFormat::Ttml => result.parsed.raw.clone(),
                LyricFormat::Lrc => generate_lrc(&result.parsed.lines),
                LyricFormat::Plain => result.text.clone(),
            };
            tokio::fs::write(&output_filename, output).await?;
            info!("歌词已保存到文件: {}", output_filename);
        }
        Err(e) => {
            error!("未能获取歌词: {}", e);
        }
    }

    info!("正在从所有提供商收集歌词...");
    let all = resolver.get_all_lyrics(&query).await;
    if all.is_empty() {
        warn!("没有任何提供商返回歌词。");
        return Ok(());
    }

    println!("\n共收集到 {} 条不重复的歌词：\n", all.len());
    for (index, result) in all.iter().enumerate() {
        let preview: String = result
            .parsed
            .lines
            .iter()
            .find(|l| !l.text.is_empty())
            .map(|l| l.text.chars().take(40).collect())
            .unwrap_or_default();
        println!(
            "  [{:2}] 来源: {:<14} | 同步: {:<5} | 行数: {:>3} | {}",
            index + 1,
            result.provider_name,
            result.parsed.is_synced,
            result.parsed.lines.len(),
            preview
        );
    }

    Ok(())
}
