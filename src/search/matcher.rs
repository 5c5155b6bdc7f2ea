//! 候选项匹配算法模块。
//!
//! 根据目标时长是否已知选择不同的策略：
//!
//! * 时长未知：按名称相似度打分，带同步歌词的候选项有少量加分。
//! * 时长已知（严格）：只接受时长最接近且差值不超过严格容差的候选项。
//! * 时长已知（宽松）：先在带同步歌词的候选项里找最接近的，找不到再放宽到全部候选项。

use tracing::debug;

use crate::{
    config::{DurationPolicy, MatchingConfig},
    model::track::Candidate,
    search::similarity::similarity,
};

/// 用于名称相似度打分的目标标题和艺术家。
#[derive(Debug, Clone, Copy)]
pub struct NameTarget<'a> {
    /// 目标标题。
    pub title: &'a str,
    /// 目标艺术家。
    pub artist: &'a str,
}

fn duration_diff(candidate: &Candidate, target_secs: f64) -> f64 {
    (candidate.duration_secs() - target_secs).abs()
}

fn closest_within<'a>(
    candidates: impl Iterator<Item = &'a Candidate>,
    target_secs: f64,
    tolerance: f64,
) -> Option<&'a Candidate> {
    candidates
        .map(|c| (c, duration_diff(c, target_secs)))
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .filter(|(_, diff)| *diff <= tolerance)
        .map(|(c, _)| c)
}

/// 返回 (名称平均相似度, 含同步歌词加分的总分)。
fn name_scores(candidate: &Candidate, target: NameTarget<'_>, config: &MatchingConfig) -> (f64, f64) {
    let name_score = (similarity(&candidate.title, target.title)
        + similarity(&candidate.artist, target.artist))
        / 2.0;
    let bonus = if candidate.has_synced_lyrics() {
        config.synced_bonus
    } else {
        0.0
    };
    (name_score, name_score + bonus)
}

/// 时长未知时的名称匹配策略。
///
/// 提供了目标名称时，每个候选项的得分为标题与艺术家相似度的平均值，
/// 带同步歌词的再加上 `synced_bonus`。得分最高的候选项只有在其名称平均相似度
/// （不含加分）超过 `name_similarity_threshold` 时才会被接受。
///
/// 未提供目标名称时，返回第一个带同步歌词的候选项，否则返回第一个候选项。
#[must_use]
pub fn select_by_name<'a>(
    candidates: &'a [Candidate],
    target: Option<NameTarget<'_>>,
    config: &MatchingConfig,
) -> Option<&'a Candidate> {
    let Some(target) = target else {
        return candidates
            .iter()
            .find(|c| c.has_synced_lyrics())
            .or_else(|| candidates.first());
    };

    let mut best: Option<(&Candidate, f64, f64)> = None;
    for candidate in candidates {
        let (name_score, score) = name_scores(candidate, target, config);

        if best.is_none_or(|(_, best_score, _)| score > best_score) {
            best = Some((candidate, score, name_score));
        }
    }

    let (candidate, score, name_score) = best?;
    debug!(
        "[Matcher] 最佳名称匹配 '{}' - '{}'，得分 {:.3}（名称 {:.3}）",
        candidate.title, candidate.artist, score, name_score
    );
    (name_score > config.name_similarity_threshold).then_some(candidate)
}

/// 时长已知时的严格策略：最接近的候选项，时长差不超过 `strict_tolerance_secs`。
#[must_use]
pub fn select_strict<'a>(
    candidates: &'a [Candidate],
    target_secs: f64,
    config: &MatchingConfig,
) -> Option<&'a Candidate> {
    closest_within(candidates.iter(), target_secs, config.strict_tolerance_secs)
}

/// 时长已知时的宽松策略。
///
/// 先在带同步歌词的候选项中找最接近的，时长差不超过 `relaxed_tolerance_secs` 即接受；
/// 否则在全部候选项中以同样的容差再找一次。
#[must_use]
pub fn select_relaxed<'a>(
    candidates: &'a [Candidate],
    target_secs: f64,
    config: &MatchingConfig,
) -> Option<&'a Candidate> {
    let tolerance = config.relaxed_tolerance_secs;
    closest_within(
        candidates.iter().filter(|c| c.has_synced_lyrics()),
        target_secs,
        tolerance,
    )
    .or_else(|| closest_within(candidates.iter(), target_secs, tolerance))
}

/// 根据目标时长与策略选择最佳候选项。
///
/// # 参数
/// * `candidates` - 某个提供商返回的候选项。
/// * `duration` - 目标时长（秒），`None` 表示未知。
/// * `names` - 时长未知时用于名称打分的目标。
/// * `policy` - 时长已知时使用的策略。
/// * `config` - 匹配阈值。
#[must_use]
pub fn select_candidate<'a>(
    candidates: &'a [Candidate],
    duration: Option<u32>,
    names: Option<NameTarget<'_>>,
    policy: DurationPolicy,
    config: &MatchingConfig,
) -> Option<&'a Candidate> {
    match duration {
        None => select_by_name(candidates, names, config),
        Some(secs) => match policy {
            DurationPolicy::Strict => select_strict(candidates, f64::from(secs), config),
            DurationPolicy::Relaxed => select_relaxed(candidates, f64::from(secs), config),
        },
    }
}

/// 聚合模式下单个提供商内候选项的尝试顺序。
///
/// * 时长已知：只保留时长差不超过 `relaxed_tolerance_secs` 的候选项，按时长差升序。
/// * 时长未知且提供了目标名称：只保留名称平均相似度超过 `name_similarity_threshold`
///   的候选项，按含加分的总分降序。
/// * 时长未知且没有目标名称：保持提供商返回的原顺序。
///
/// 得分相同时保持原顺序。
#[must_use]
pub fn aggregate_order<'a>(
    candidates: &'a [Candidate],
    duration: Option<u32>,
    names: Option<NameTarget<'_>>,
    config: &MatchingConfig,
) -> Vec<&'a Candidate> {
    match (duration, names) {
        (Some(secs), _) => {
            let target = f64::from(secs);
            let mut within: Vec<(&Candidate, f64)> = candidates
                .iter()
                .map(|c| (c, duration_diff(c, target)))
                .filter(|(_, diff)| *diff <= config.relaxed_tolerance_secs)
                .collect();
            within.sort_by(|(_, a), (_, b)| a.total_cmp(b));
            within.into_iter().map(|(c, _)| c).collect()
        }
        (None, Some(target)) => {
            let mut accepted: Vec<(&Candidate, f64)> = candidates
                .iter()
                .filter_map(|c| {
                    let (name_score, score) = name_scores(c, target, config);
                    (name_score > config.name_similarity_threshold).then_some((c, score))
                })
                .collect();
            accepted.sort_by(|(_, a), (_, b)| b.total_cmp(a));
            accepted.into_iter().map(|(c, _)| c).collect()
        }
        (None, None) => candidates.iter().collect(),
    }
}
