//! 搜索模块
//!
//! 负责把调用方的查询转换为提供商可接受的搜索条件，并按固定顺序尝试多种搜索策略。

use tracing::{debug, info, warn};

use crate::{
    error::{LyricsResolverError, Result},
    model::track::{Candidate, LyricsQuery, SearchQuery},
    providers::TrackSearchProvider,
};

pub mod matcher;
pub mod normalizer;
pub mod similarity;

use normalizer::{clean_artist, clean_title};

/// 清理后的标题与艺术家。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedNames {
    /// 清理后的标题。
    pub title: String,
    /// 清理后的主要艺术家。
    pub artist: String,
}

impl CleanedNames {
    /// 清理查询中的标题与艺术家。
    pub fn from_query(query: &LyricsQuery) -> Self {
        Self {
            title: clean_title(&query.title),
            artist: clean_artist(&query.artist),
        }
    }
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// 按尝试顺序生成搜索条件。
///
/// 1. 清理后的标题 + 艺术家（+ 专辑）
/// 2. 仅清理后的标题
/// 3. 自由文本：标题与艺术家
/// 4. 自由文本：仅标题
/// 5. 未清理的原始标题 + 艺术家（+ 专辑）
///
/// 与之前某个策略完全相同的条件会被跳过，空条件不会出现。
pub fn build_search_strategies(query: &LyricsQuery, cleaned: &CleanedNames) -> Vec<SearchQuery> {
    let album = query.album.as_deref().and_then(non_empty);
    let combined = format!("{} {}", cleaned.title, cleaned.artist);

    let candidates = [
        SearchQuery {
            title: non_empty(&cleaned.title),
            artist: non_empty(&cleaned.artist),
            album: album.clone(),
            q: None,
        },
        SearchQuery {
            title: non_empty(&cleaned.title),
            ..Default::default()
        },
        SearchQuery {
            q: non_empty(&combined),
            ..Default::default()
        },
        SearchQuery {
            q: non_empty(&cleaned.title),
            ..Default::default()
        },
        SearchQuery {
            title: non_empty(&query.title),
            artist: non_empty(&query.artist),
            album,
            q: None,
        },
    ];

    let mut strategies: Vec<SearchQuery> = Vec::with_capacity(candidates.len());
    for strategy in candidates {
        let is_empty = strategy.title.is_none() && strategy.q.is_none();
        if !is_empty && !strategies.contains(&strategy) {
            strategies.push(strategy);
        }
    }
    strategies
}

/// 在指定提供商上依次执行各搜索策略，返回第一个非空的"带歌词"候选项集合。
///
/// 单个策略失败时记录警告并继续下一个。所有策略都失败时返回最后一个错误；
/// 至少有一个策略成功但都没有带歌词的结果时返回空列表。
pub async fn search_with_strategies(
    provider: &dyn TrackSearchProvider,
    query: &LyricsQuery,
    cleaned: &CleanedNames,
) -> Result<Vec<Candidate>> {
    let strategies = build_search_strategies(query, cleaned);
    info!(
        "[Search] 开始在 '{}' 上搜索 '{}' - '{}'，共 {} 个策略。",
        provider.name(),
        query.title,
        query.artist,
        strategies.len()
    );

    let mut last_error: Option<LyricsResolverError> = None;
    let mut any_succeeded = false;

    for (level, strategy) in strategies.iter().enumerate() {
        match provider.search(strategy).await {
            Ok(candidates) => {
                any_succeeded = true;
                let with_lyrics: Vec<Candidate> =
                    candidates.into_iter().filter(Candidate::has_lyrics).collect();
                if !with_lyrics.is_empty() {
                    debug!(
                        "[Search] 策略 {} 命中，找到 {} 个带歌词的结果。",
                        level + 1,
                        with_lyrics.len()
                    );
                    return Ok(with_lyrics);
                }
                debug!("[Search] 策略 {} 没有带歌词的结果。", level + 1);
            }
            Err(e) => {
                warn!(
                    "[Search] 策略 {} 执行失败 (查询: {:?})，错误: {}。继续执行下一策略。",
                    level + 1,
                    strategy,
                    e
                );
                last_error = Some(e);
            }
        }
    }

    match last_error {
        Some(e) if !any_succeeded => Err(e),
        _ => Ok(Vec::new()),
    }
}
