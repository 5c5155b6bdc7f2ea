#![warn(missing_docs)]

//! # Lyrics Resolver RS
//!
//! 一个 Rust 库，用于根据 (标题, 艺术家, 时长) 或视频 ID 从多个歌词提供商获取歌词，
//! 在不一致的结果中挑选最佳匹配，并把三种歌词编码统一为同一个结构化模型。
//!
//! ## 主要功能
//!
//! - **歌词解析**: 按固定优先级依次尝试逐字 TTML 提供商、视频 ID 提供商和名称搜索提供商，
//!   返回第一个成功的结果。
//! - **歌词聚合**: 从所有提供商收集结果，按内容去重，并限制总数与纯文本结果数量。
//! - **歌词转换**: 纯文本、LRC 与 TTML 统一解析为 [`StructuredLyrics`]，并可写回 LRC。
//!
//! ## 获取歌词
//!
//! ```rust,no_run
//! use lyrics_resolver_rs::{LyricsResolver, config::ResolverConfig, model::track::LyricsQuery};
//!
//! async {
//!     let resolver = LyricsResolver::from_config(ResolverConfig::default()).unwrap();
//!     let query = LyricsQuery::new("Blinding Lights", "The Weeknd").with_duration_secs(200);
//!
//!     match resolver.get_lyrics_with_source(&query).await {
//!         Ok(result) => println!(
//!             "从 '{}' 获取歌词成功！共 {} 行。",
//!             result.provider_name,
//!             result.parsed.lines.len()
//!         ),
//!         Err(e) => eprintln!("发生错误: {}", e),
//!     }
//! };
//! ```
//!
//! ## 格式转换
//!
//! ```rust
//! use lyrics_resolver_rs::converter::{generate_lrc, parse_lrc};
//!
//! let lyrics = parse_lrc("[00:01.00]Hello\n[00:02.50]World");
//! assert!(lyrics.is_synced);
//! assert_eq!(generate_lrc(&lyrics.lines), "[00:01.00]Hello\n[00:02.50]World");
//!
//! let map = lyrics.to_sentence_map();
//! assert_eq!(map.get(&0).map(String::as_str), Some(""));
//! ```
pub mod config;
pub mod converter;
pub mod error;
pub mod model;
pub mod providers;
pub mod search;

use std::collections::HashSet;

use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};
use tracing::{debug, info, warn};

pub use crate::{
    converter::types::StructuredLyrics,
    error::{LyricsResolverError, Result},
    model::track::{LyricsQuery, LyricsResult, MatchResult},
};

use crate::{
    config::{ResolverConfig, build_http_client},
    converter::{generate_lrc_with_words, parse_lyrics, try_parse_ttml},
    model::track::{Candidate, MarkupQuery},
    providers::{
        MarkupProvider, TrackSearchProvider, VideoSearchProvider,
        better_lyrics::BetterLyricsClient, lrclib::LrcLibClient, simpmusic::SimpMusicClient,
    },
    search::{
        CleanedNames,
        matcher::{NameTarget, aggregate_order, select_candidate},
        search_with_strategies,
    },
};

// ==========================================================
//  顶层 API
// ==========================================================

/// 提供商的种类，也是单次解析时的尝试顺序。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum ProviderKind {
    /// 逐字 TTML 提供商。
    Markup,
    /// 按视频 ID 搜索的提供商。
    VideoSearch,
    /// 按名称/时长搜索的提供商。
    TrackSearch,
}

/// 顶层歌词解析器，封装了所有提供商，为用户提供统一、简单的接口。
///
/// 所有提供商共享构造时注入的同一个 HTTP 客户端，随解析器一起释放。
pub struct LyricsResolver {
    config: ResolverConfig,
    markup: Option<Box<dyn MarkupProvider>>,
    video: Option<Box<dyn VideoSearchProvider>>,
    track_search: Option<Box<dyn TrackSearchProvider>>,
}

impl LyricsResolver {
    /// 使用注入的 HTTP 客户端创建解析器，并按配置加载所有启用的提供商。
    pub fn new(http_client: reqwest::Client, config: ResolverConfig) -> Self {
        let endpoints = &config.providers;

        let markup = endpoints.better_lyrics.enabled.then(|| {
            Box::new(BetterLyricsClient::from_config(
                http_client.clone(),
                &endpoints.better_lyrics,
            )) as Box<dyn MarkupProvider>
        });
        let video = endpoints.simpmusic.enabled.then(|| {
            Box::new(SimpMusicClient::from_config(
                http_client.clone(),
                &endpoints.simpmusic,
            )) as Box<dyn VideoSearchProvider>
        });
        let track_search = endpoints.lrclib.enabled.then(|| {
            Box::new(LrcLibClient::from_config(http_client.clone(), &endpoints.lrclib))
                as Box<dyn TrackSearchProvider>
        });

        info!(
            "[Resolver] 已加载提供商: markup={}, video={}, search={}",
            markup.is_some(),
            video.is_some(),
            track_search.is_some()
        );

        Self {
            config,
            markup,
            video,
            track_search,
        }
    }

    /// 按配置构建共享的 HTTP 客户端并创建解析器。
    pub fn from_config(config: ResolverConfig) -> Result<Self> {
        let http_client = build_http_client(&config.providers)?;
        Ok(Self::new(http_client, config))
    }

    /// 创建一个不带任何提供商的解析器，之后可通过 `with_*_provider` 注入。
    pub fn with_config(config: ResolverConfig) -> Self {
        Self {
            config,
            markup: None,
            video: None,
            track_search: None,
        }
    }

    /// 注入逐字 TTML 提供商。
    #[must_use]
    pub fn with_markup_provider(mut self, provider: impl MarkupProvider + 'static) -> Self {
        self.markup = Some(Box::new(provider));
        self
    }

    /// 注入按视频 ID 搜索的提供商。
    #[must_use]
    pub fn with_video_provider(mut self, provider: impl VideoSearchProvider + 'static) -> Self {
        self.video = Some(Box::new(provider));
        self
    }

    /// 注入按名称/时长搜索的提供商。
    #[must_use]
    pub fn with_search_provider(mut self, provider: impl TrackSearchProvider + 'static) -> Self {
        self.track_search = Some(Box::new(provider));
        self
    }

    /// 当前使用的配置。
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// 针对给定查询，按尝试顺序列出可用的提供商种类。
    ///
    /// 未配置的提供商不会出现；没有视频 ID 时跳过视频 ID 提供商。
    pub fn provider_order(&self, query: &LyricsQuery) -> Vec<ProviderKind> {
        ProviderKind::iter()
            .filter(|kind| match kind {
                ProviderKind::Markup => self.markup.is_some(),
                ProviderKind::VideoSearch => self.video.is_some() && query.video_id.is_some(),
                ProviderKind::TrackSearch => self.track_search.is_some(),
            })
            .collect()
    }

    fn provider_name(&self, kind: ProviderKind) -> &'static str {
        match kind {
            ProviderKind::Markup => self.markup.as_ref().map(|p| p.name()),
            ProviderKind::VideoSearch => self.video.as_ref().map(|p| p.name()),
            ProviderKind::TrackSearch => self.track_search.as_ref().map(|p| p.name()),
        }
        .unwrap_or_else(|| kind.into())
    }

    /// 对单个提供商执行一次完整的尝试：搜索、匹配并解析歌词。
    pub async fn attempt(&self, kind: ProviderKind, query: &LyricsQuery) -> MatchResult {
        let provider_name = self.provider_name(kind);
        let outcome = match kind {
            ProviderKind::Markup => self.attempt_markup(query).await,
            ProviderKind::VideoSearch => self.attempt_video(query).await,
            ProviderKind::TrackSearch => self.attempt_track_search(query).await,
        };

        match &outcome {
            Ok(_) => info!("[Resolver] 提供商 '{provider_name}' 成功。"),
            Err(e) if e.is_no_match() => debug!("[Resolver] {e}"),
            Err(e) => warn!("[Resolver] 提供商 '{provider_name}' 失败: {e}"),
        }

        MatchResult {
            provider_name,
            outcome,
        }
    }

    /// 按优先级依次尝试各提供商，返回第一个成功的结构化歌词。
    pub async fn get_lyrics(&self, query: &LyricsQuery) -> Result<StructuredLyrics> {
        Ok(self.get_lyrics_with_source(query).await?.parsed)
    }

    /// 与 [`Self::get_lyrics`] 相同，但同时返回提供歌词的提供商名称。
    ///
    /// # 返回
    /// * `Ok(LyricsResult)` - 第一个成功的提供商给出的结果。
    /// * `Err(LyricsResolverError::Unavailable)` - 所有提供商都没有可用歌词。
    pub async fn get_lyrics_with_source(&self, query: &LyricsQuery) -> Result<LyricsResult> {
        info!(
            "[Resolver] 开始解析 '{}' - '{}' (时长: {:?}, 视频 ID: {:?})",
            query.title, query.artist, query.duration, query.video_id
        );

        for kind in self.provider_order(query) {
            if let Ok(result) = self.attempt(kind, query).await.outcome {
                return Ok(result);
            }
        }

        info!("[Resolver] 所有提供商都未能找到歌词。");
        Err(LyricsResolverError::Unavailable)
    }

    /// 从所有可用的提供商收集歌词，按内容去重。
    ///
    /// * 所有提供商合计最多接受 `max_results` 条结果。
    /// * 每个候选项只提供一条结果，解析不出任何行的歌词不会被收集。
    /// * 每个提供商最多接受 `max_plain_per_provider` 条纯文本结果。
    /// * 以歌词文本的前 `dedup_prefix_chars` 个字符作为指纹，重复的结果被丢弃且不计入上限。
    ///
    /// 单个提供商的失败只会被记录，不会中断收集。
    pub async fn get_all_lyrics(&self, query: &LyricsQuery) -> Vec<LyricsResult> {
        let mut collector = AggregateCollector::new(&self.config);
        let cleaned = CleanedNames::from_query(query);

        for kind in self.provider_order(query) {
            if collector.is_full() {
                break;
            }
            let provider_name = self.provider_name(kind);

            let names = NameTarget {
                title: &cleaned.title,
                artist: &cleaned.artist,
            };
            let (candidates, names) = match kind {
                ProviderKind::Markup => {
                    if let Ok(result) = self.attempt(kind, query).await.outcome {
                        collector.offer(result);
                    }
                    continue;
                }
                ProviderKind::VideoSearch => match (&self.video, &query.video_id) {
                    (Some(provider), Some(video_id)) => {
                        (provider.search_by_id(video_id).await, None)
                    }
                    _ => continue,
                },
                ProviderKind::TrackSearch => match &self.track_search {
                    Some(provider) => (
                        search_with_strategies(provider.as_ref(), query, &cleaned).await,
                        Some(names),
                    ),
                    None => continue,
                },
            };

            match candidates {
                Ok(candidates) => {
                    let with_lyrics: Vec<Candidate> =
                        candidates.into_iter().filter(Candidate::has_lyrics).collect();
                    let ordered = aggregate_order(
                        &with_lyrics,
                        query.duration,
                        names,
                        &self.config.matching,
                    );
                    collector.collect_from(provider_name, &ordered);
                }
                Err(e) => warn!("[Resolver] 提供商 '{provider_name}' 失败，跳过: {e}"),
            }
        }

        info!("[Resolver] 聚合完成，共 {} 条结果。", collector.results.len());
        collector.results
    }

    async fn attempt_markup(&self, query: &LyricsQuery) -> Result<LyricsResult> {
        let provider = self
            .markup
            .as_ref()
            .ok_or_else(|| LyricsResolverError::ProviderNotConfigured(ProviderKind::Markup.to_string()))?;

        let cleaned = CleanedNames::from_query(query);
        let markup_query = MarkupQuery {
            title: cleaned.title,
            artist: cleaned.artist,
            duration: query.duration,
            album: query.album.clone(),
        };

        let Some(markup) = provider.fetch_markup(&markup_query).await? else {
            return Err(LyricsResolverError::NoMatch(provider.name().to_string()));
        };

        let parsed = try_parse_ttml(&markup)?;
        if parsed.lines.is_empty() {
            return Err(LyricsResolverError::Parser(format!(
                "{} 返回的 TTML 中没有可用的歌词行",
                provider.name()
            )));
        }

        Ok(LyricsResult {
            provider_name: provider.name().to_string(),
            text: generate_lrc_with_words(&parsed.lines),
            parsed,
        })
    }

    async fn attempt_video(&self, query: &LyricsQuery) -> Result<LyricsResult> {
        let provider = self.video.as_ref().ok_or_else(|| {
            LyricsResolverError::ProviderNotConfigured(ProviderKind::VideoSearch.to_string())
        })?;
        let Some(video_id) = query.video_id.as_deref() else {
            return Err(LyricsResolverError::NoMatch(provider.name().to_string()));
        };

        let candidates: Vec<Candidate> = provider
            .search_by_id(video_id)
            .await?
            .into_iter()
            .filter(Candidate::has_lyrics)
            .collect();

        let selected = select_candidate(
            &candidates,
            query.duration,
            None,
            self.config.matching.video_policy,
            &self.config.matching,
        );
        selected
            .and_then(|c| lyrics_from_candidate(provider.name(), c))
            .ok_or_else(|| LyricsResolverError::NoMatch(provider.name().to_string()))
    }

    async fn attempt_track_search(&self, query: &LyricsQuery) -> Result<LyricsResult> {
        let provider = self.track_search.as_ref().ok_or_else(|| {
            LyricsResolverError::ProviderNotConfigured(ProviderKind::TrackSearch.to_string())
        })?;

        let cleaned = CleanedNames::from_query(query);
        let candidates = search_with_strategies(provider.as_ref(), query, &cleaned).await?;

        let names = NameTarget {
            title: &cleaned.title,
            artist: &cleaned.artist,
        };
        let selected = select_candidate(
            &candidates,
            query.duration,
            Some(names),
            self.config.matching.search_policy,
            &self.config.matching,
        );
        selected
            .and_then(|c| lyrics_from_candidate(provider.name(), c))
            .ok_or_else(|| LyricsResolverError::NoMatch(provider.name().to_string()))
    }
}

/// 把选中的候选项转换为歌词结果。
///
/// 优先使用同步歌词；同步歌词解析不出任何行时退回到纯文本歌词。
fn lyrics_from_candidate(provider_name: &str, candidate: &Candidate) -> Option<LyricsResult> {
    [candidate.synced_text(), candidate.plain_text()]
        .into_iter()
        .flatten()
        .map(|text| lyrics_from_text(provider_name, text))
        .find(|result| !result.parsed.lines.is_empty())
}

fn lyrics_from_text(provider_name: &str, text: &str) -> LyricsResult {
    LyricsResult {
        provider_name: provider_name.to_string(),
        text: text.to_string(),
        parsed: parse_lyrics(text),
    }
}

/// 聚合模式下跨提供商共享的收集状态。
struct AggregateCollector {
    max_results: usize,
    max_plain_per_provider: usize,
    prefix_chars: usize,
    seen: HashSet<String>,
    results: Vec<LyricsResult>,
}

impl AggregateCollector {
    fn new(config: &ResolverConfig) -> Self {
        Self {
            max_results: config.aggregate.max_results,
            max_plain_per_provider: config.aggregate.max_plain_per_provider,
            prefix_chars: config.aggregate.dedup_prefix_chars,
            seen: HashSet::new(),
            results: Vec::new(),
        }
    }

    fn is_full(&self) -> bool {
        self.results.len() >= self.max_results
    }

    /// 尝试接受一条结果。已满或内容重复时返回 `false`。
    fn offer(&mut self, result: LyricsResult) -> bool {
        if self.is_full() {
            return false;
        }
        let key: String = result.text.chars().take(self.prefix_chars).collect();
        if !self.seen.insert(key) {
            debug!(
                "[Resolver] 丢弃来自 '{}' 的重复歌词。",
                result.provider_name
            );
            return false;
        }
        self.results.push(result);
        true
    }

    /// 每个候选项提供一条结果：优先同步歌词，解析不出任何行时退回纯文本歌词。
    ///
    /// 只有纯文本结果计入每个提供商的纯文本上限。
    fn collect_from(&mut self, provider_name: &str, candidates: &[&Candidate]) {
        let mut plain_accepted = 0usize;

        for candidate in candidates {
            if self.is_full() {
                break;
            }
            let Some(result) = lyrics_from_candidate(provider_name, candidate) else {
                debug!("[Resolver] 候选项 '{}' 的歌词解析不出任何行，跳过。", candidate.id);
                continue;
            };

            let is_plain = !result.parsed.is_synced;
            if is_plain && plain_accepted >= self.max_plain_per_provider {
                continue;
            }
            if self.offer(result) && is_plain {
                plain_accepted += 1;
            }
        }
    }
}
