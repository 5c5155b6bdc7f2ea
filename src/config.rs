//! 负责处理解析器的配置：匹配阈值、聚合上限与各提供商的端点。
//!
//! 配置以 JSON 形式持久化在用户配置目录下的 `lyrics-resolver/config.json`。

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use crate::error::{LyricsResolverError, Result};

const CONFIG_DIR_NAME: &str = "lyrics-resolver";
const CONFIG_FILE_NAME: &str = "config.json";

/// 时长已知时使用的候选项选择策略。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DurationPolicy {
    /// 只接受时长差不超过 `strict_tolerance_secs` 的最近候选项。
    Strict,
    /// 优先选择带同步歌词的候选项，时长差不超过 `relaxed_tolerance_secs`。
    #[default]
    Relaxed,
}

/// 候选项匹配相关的阈值。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// 严格时长匹配的容差（秒）。
    pub strict_tolerance_secs: f64,
    /// 宽松时长匹配的容差（秒）。
    pub relaxed_tolerance_secs: f64,
    /// 时长未知时，名称相似度平均值必须超过此阈值。
    pub name_similarity_threshold: f64,
    /// 时长未知时，带同步歌词的候选项获得的额外加分。
    pub synced_bonus: f64,
    /// 按名称/时长搜索的提供商使用的时长策略。
    pub search_policy: DurationPolicy,
    /// 按视频 ID 搜索的提供商使用的时长策略。
    pub video_policy: DurationPolicy,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            strict_tolerance_secs: 2.0,
            relaxed_tolerance_secs: 5.0,
            name_similarity_threshold: 0.6,
            synced_bonus: 0.1,
            search_policy: DurationPolicy::Relaxed,
            video_policy: DurationPolicy::Relaxed,
        }
    }
}

/// 聚合模式（获取全部歌词）的上限。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregateConfig {
    /// 所有提供商合计最多接受的结果数量。
    pub max_results: usize,
    /// 每个提供商最多接受的纯文本（未同步）结果数量。
    pub max_plain_per_provider: usize,
    /// 去重时用作指纹的歌词前缀长度（字符数）。
    pub dedup_prefix_chars: usize,
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            max_results: 5,
            max_plain_per_provider: 1,
            dedup_prefix_chars: 100,
        }
    }
}

/// 单个 HTTP 提供商的端点配置。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// 是否启用该提供商。
    pub enabled: bool,
    /// API 的基础地址，不带结尾斜杠。
    pub base_url: String,
}

impl EndpointConfig {
    fn enabled(base_url: &str) -> Self {
        Self {
            enabled: true,
            base_url: base_url.to_string(),
        }
    }
}

/// 所有提供商共享的 HTTP 配置以及各自的端点。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// 请求时使用的 User-Agent。
    pub user_agent: String,
    /// 单次请求的超时时间（秒）。
    pub timeout_secs: u64,
    /// LRCLIB（按名称/时长搜索）。
    pub lrclib: EndpointConfig,
    /// SimpMusic（按视频 ID 搜索）。
    pub simpmusic: EndpointConfig,
    /// BetterLyrics（逐字 TTML）。
    pub better_lyrics: EndpointConfig,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("lyrics-resolver-rs/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 10,
            lrclib: EndpointConfig::enabled("https://lrclib.net"),
            simpmusic: EndpointConfig::enabled("https://api-lyrics.simpmusic.org"),
            better_lyrics: EndpointConfig::enabled("https://lyrics-api.boidu.dev"),
        }
    }
}

/// 解析器的完整配置。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// 匹配阈值。
    pub matching: MatchingConfig,
    /// 聚合上限。
    pub aggregate: AggregateConfig,
    /// 提供商端点。
    pub providers: ProvidersConfig,
}

/// 获取应用配置目录下指定文件的完整路径。
///
/// # 参数
/// * `filename` - 目标配置文件的名称，例如 "config.json"。
pub(crate) fn get_config_file_path(filename: &str) -> Result<PathBuf> {
    if let Some(mut config_dir) = dirs::config_dir() {
        config_dir.push(CONFIG_DIR_NAME);
        fs::create_dir_all(&config_dir)?;
        config_dir.push(filename);
        Ok(config_dir)
    } else {
        Err(LyricsResolverError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "无法找到用户配置目录",
        )))
    }
}

/// 从配置文件加载配置。
///
/// 文件不存在时返回默认配置；文件存在但内容无效时返回错误。
pub fn load_config() -> Result<ResolverConfig> {
    let config_path = get_config_file_path(CONFIG_FILE_NAME)?;
    match fs::read_to_string(&config_path) {
        Ok(content) => {
            let config = parse_config(&content)?;
            info!("已从 {:?} 加载配置。", config_path);
            Ok(config)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!("配置文件不存在，使用默认配置。");
            Ok(ResolverConfig::default())
        }
        Err(e) => Err(e.into()),
    }
}

/// 将配置序列化为 JSON 并保存到配置文件。
pub fn save_config(config: &ResolverConfig) -> Result<()> {
    let config_path = get_config_file_path(CONFIG_FILE_NAME)?;
    let content = serde_json::to_string_pretty(config)?;
    fs::write(config_path, content)?;
    info!("配置已保存。");
    Ok(())
}

/// 从 JSON 文本解析配置，缺失的字段使用默认值。
pub fn parse_config(content: &str) -> Result<ResolverConfig> {
    Ok(serde_json::from_str(content)?)
}

/// 根据配置创建所有提供商共享的 HTTP 客户端。
pub fn build_http_client(config: &ProvidersConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}
