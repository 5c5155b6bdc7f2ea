use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use lyrics_resolver_rs::{
    LyricsResolver, LyricsResolverError, ProviderKind, Result,
    config::{DurationPolicy, ResolverConfig},
    model::track::{Candidate, LyricsQuery, MarkupQuery, SearchQuery},
    providers::{MarkupProvider, TrackSearchProvider, VideoSearchProvider},
};

const MARKUP_NAME: &str = "mock-markup";
const VIDEO_NAME: &str = "mock-video";
const SEARCH_NAME: &str = "mock-search";

const SIMPLE_TTML: &str = r#"<tt xmlns="http://www.w3.org/ns/ttml"><body><div><p begin="1"><span begin="1" end="1.5">Hi</span></p></div></body></tt>"#;

/// 提供商的预设回复。
#[derive(Clone)]
enum Reply {
    Candidates(Vec<Candidate>),
    Fail,
}

impl Reply {
    fn to_result(&self, provider: &str) -> Result<Vec<Candidate>> {
        match self {
            Reply::Candidates(c) => Ok(c.clone()),
            Reply::Fail => Err(LyricsResolverError::ApiError(provider.to_string())),
        }
    }
}

struct MockMarkup {
    markup: Option<String>,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl MarkupProvider for MockMarkup {
    fn name(&self) -> &'static str {
        MARKUP_NAME
    }

    async fn fetch_markup(&self, _query: &MarkupQuery) -> Result<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.markup.clone())
    }
}

struct MockVideo {
    reply: Reply,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl VideoSearchProvider for MockVideo {
    fn name(&self) -> &'static str {
        VIDEO_NAME
    }

    async fn search_by_id(&self, _video_id: &str) -> Result<Vec<Candidate>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.to_result(VIDEO_NAME)
    }
}

struct MockSearch {
    reply: Reply,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl TrackSearchProvider for MockSearch {
    fn name(&self) -> &'static str {
        SEARCH_NAME
    }

    async fn search(&self, _query: &SearchQuery) -> Result<Vec<Candidate>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.to_result(SEARCH_NAME)
    }
}

fn markup(markup: Option<&str>) -> (MockMarkup, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let provider = MockMarkup {
        markup: markup.map(str::to_string),
        calls: Arc::clone(&calls),
    };
    (provider, calls)
}

fn video(reply: Reply) -> (MockVideo, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let provider = MockVideo {
        reply,
        calls: Arc::clone(&calls),
    };
    (provider, calls)
}

fn search(reply: Reply) -> (MockSearch, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let provider = MockSearch {
        reply,
        calls: Arc::clone(&calls),
    };
    (provider, calls)
}

fn candidate(id: &str, duration: f64, synced: Option<&str>, plain: Option<&str>) -> Candidate {
    Candidate {
        id: id.to_string(),
        title: "Song".to_string(),
        artist: "Artist".to_string(),
        duration: Some(duration),
        synced_lyrics: synced.map(str::to_string),
        plain_lyrics: plain.map(str::to_string),
        ..Default::default()
    }
}

fn named(title: &str, artist: &str, synced: Option<&str>, plain: Option<&str>) -> Candidate {
    Candidate {
        id: title.to_string(),
        title: title.to_string(),
        artist: artist.to_string(),
        synced_lyrics: synced.map(str::to_string),
        plain_lyrics: plain.map(str::to_string),
        ..Default::default()
    }
}

fn query() -> LyricsQuery {
    LyricsQuery::new("Song", "Artist").with_duration_secs(200)
}

// ==========================================================
//  单次解析
// ==========================================================

#[tokio::test]
async fn test_markup_success_short_circuits() {
    let (markup_provider, markup_calls) = markup(Some(SIMPLE_TTML));
    let (search_provider, search_calls) = search(Reply::Candidates(vec![candidate(
        "s1",
        200.0,
        Some("[00:01.00]From search"),
        None,
    )]));
    let resolver = LyricsResolver::with_config(ResolverConfig::default())
        .with_markup_provider(markup_provider)
        .with_search_provider(search_provider);

    let result = resolver.get_lyrics_with_source(&query()).await.unwrap();

    assert_eq!(result.provider_name, MARKUP_NAME);
    assert_eq!(result.text, "[00:01.00]Hi\n<Hi:1:1.5>");
    assert!(result.parsed.is_synced);
    assert!(result.parsed.has_word_timing());
    assert_eq!(markup_calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        search_calls.load(Ordering::SeqCst),
        0,
        "第一个提供商成功后不应再请求后续提供商"
    );
}

#[tokio::test]
async fn test_unparsable_markup_falls_through_to_search() {
    let (markup_provider, _) = markup(Some("<tt><body><div></div></body></tt>"));
    let (search_provider, _) = search(Reply::Candidates(vec![candidate(
        "s1",
        200.0,
        Some("[00:01.00]From search"),
        None,
    )]));
    let resolver = LyricsResolver::with_config(ResolverConfig::default())
        .with_markup_provider(markup_provider)
        .with_search_provider(search_provider);

    let attempt = resolver.attempt(ProviderKind::Markup, &query()).await;
    assert_eq!(attempt.provider_name, MARKUP_NAME);
    assert!(matches!(attempt.outcome, Err(LyricsResolverError::Parser(_))));

    let result = resolver.get_lyrics_with_source(&query()).await.unwrap();
    assert_eq!(result.provider_name, SEARCH_NAME);
    assert_eq!(result.parsed.lines[0].text, "From search");
}

#[tokio::test]
async fn test_truncated_markup_is_xml_error_and_falls_through() {
    let (markup_provider, _) = markup(Some(r#"<tt><body><div><p begin="1">one</p><p begin="2">two"#));
    let (search_provider, _) = search(Reply::Candidates(vec![candidate(
        "s1",
        200.0,
        Some("[00:01.00]From search"),
        None,
    )]));
    let resolver = LyricsResolver::with_config(ResolverConfig::default())
        .with_markup_provider(markup_provider)
        .with_search_provider(search_provider);

    let attempt = resolver.attempt(ProviderKind::Markup, &query()).await;
    assert!(matches!(attempt.outcome, Err(LyricsResolverError::XmlParse(_))));

    let result = resolver.get_lyrics_with_source(&query()).await.unwrap();
    assert_eq!(result.provider_name, SEARCH_NAME);
}

#[tokio::test]
async fn test_absent_markup_is_no_match() {
    let (markup_provider, _) = markup(None);
    let resolver =
        LyricsResolver::with_config(ResolverConfig::default()).with_markup_provider(markup_provider);

    let attempt = resolver.attempt(ProviderKind::Markup, &query()).await;
    assert!(attempt.outcome.is_err_and(|e| e.is_no_match()));
}

#[tokio::test]
async fn test_exhaustion_is_unavailable() {
    let (markup_provider, _) = markup(None);
    let (search_provider, search_calls) = search(Reply::Candidates(Vec::new()));
    let resolver = LyricsResolver::with_config(ResolverConfig::default())
        .with_markup_provider(markup_provider)
        .with_search_provider(search_provider);

    let result = resolver.get_lyrics(&query()).await;

    assert!(matches!(result, Err(LyricsResolverError::Unavailable)));
    assert!(search_calls.load(Ordering::SeqCst) > 0, "所有搜索策略都应被尝试");
}

#[tokio::test]
async fn test_transport_failure_is_unavailable_not_propagated() {
    let (search_provider, _) = search(Reply::Fail);
    let resolver =
        LyricsResolver::with_config(ResolverConfig::default()).with_search_provider(search_provider);

    let attempt = resolver.attempt(ProviderKind::TrackSearch, &query()).await;
    assert!(matches!(attempt.outcome, Err(LyricsResolverError::ApiError(_))));

    let result = resolver.get_lyrics_with_source(&query()).await;
    assert!(matches!(result, Err(LyricsResolverError::Unavailable)));
}

#[tokio::test]
async fn test_video_provider_requires_video_id() {
    let (video_provider, video_calls) = video(Reply::Candidates(vec![candidate(
        "v1",
        200.0,
        Some("[00:01.00]From video"),
        None,
    )]));
    let (search_provider, _) = search(Reply::Candidates(vec![candidate(
        "s1",
        200.0,
        Some("[00:01.00]From search"),
        None,
    )]));
    let resolver = LyricsResolver::with_config(ResolverConfig::default())
        .with_video_provider(video_provider)
        .with_search_provider(search_provider);

    let without_id = resolver.get_lyrics_with_source(&query()).await.unwrap();
    assert_eq!(without_id.provider_name, SEARCH_NAME);
    assert_eq!(video_calls.load(Ordering::SeqCst), 0);

    let with_id_query = query().with_video_id("dQw4w9WgXcQ");
    assert_eq!(
        resolver.provider_order(&with_id_query),
        vec![ProviderKind::VideoSearch, ProviderKind::TrackSearch]
    );
    let with_id = resolver.get_lyrics_with_source(&with_id_query).await.unwrap();
    assert_eq!(with_id.provider_name, VIDEO_NAME);
    assert_eq!(with_id.parsed.lines[0].text, "From video");
}

#[tokio::test]
async fn test_video_relaxed_picks_closest_within_tolerance() {
    let reply = Reply::Candidates(vec![
        candidate("far", 180.0, Some("[00:01.00]one-eighty"), None),
        candidate("near", 200.0, Some("[00:01.00]two-hundred"), None),
    ]);
    let (video_provider, _) = video(reply);
    let resolver =
        LyricsResolver::with_config(ResolverConfig::default()).with_video_provider(video_provider);

    let near = LyricsQuery::new("Song", "Artist")
        .with_duration_secs(202)
        .with_video_id("id");
    let result = resolver.get_lyrics_with_source(&near).await.unwrap();
    assert_eq!(result.parsed.lines[0].text, "two-hundred");

    let too_far = LyricsQuery::new("Song", "Artist")
        .with_duration_secs(210)
        .with_video_id("id");
    let result = resolver.get_lyrics_with_source(&too_far).await;
    assert!(
        matches!(result, Err(LyricsResolverError::Unavailable)),
        "时长差超过 5 秒时不应选中任何候选项"
    );
}

#[tokio::test]
async fn test_relaxed_prefers_synced_candidate() {
    let (search_provider, _) = search(Reply::Candidates(vec![
        candidate("exact-plain", 202.0, None, Some("plain words")),
        candidate("close-synced", 199.0, Some("[00:01.00]synced words"), None),
    ]));
    let resolver =
        LyricsResolver::with_config(ResolverConfig::default()).with_search_provider(search_provider);

    let query = LyricsQuery::new("Song", "Artist").with_duration_secs(202);
    let result = resolver.get_lyrics_with_source(&query).await.unwrap();

    assert!(result.parsed.is_synced);
    assert_eq!(result.parsed.lines[0].text, "synced words");
}

#[tokio::test]
async fn test_strict_policy_rejects_outside_two_seconds() {
    let mut config = ResolverConfig::default();
    config.matching.search_policy = DurationPolicy::Strict;

    let (search_provider, _) = search(Reply::Candidates(vec![candidate(
        "off-by-four",
        198.0,
        Some("[00:01.00]words"),
        None,
    )]));
    let resolver = LyricsResolver::with_config(config.clone()).with_search_provider(search_provider);
    let query = LyricsQuery::new("Song", "Artist").with_duration_secs(202);
    assert!(resolver.get_lyrics(&query).await.is_err());

    let (search_provider, _) = search(Reply::Candidates(vec![candidate(
        "off-by-one",
        201.0,
        Some("[00:01.00]words"),
        None,
    )]));
    let resolver = LyricsResolver::with_config(config).with_search_provider(search_provider);
    assert!(resolver.get_lyrics(&query).await.is_ok());
}

#[tokio::test]
async fn test_unknown_duration_matches_by_name() {
    let (search_provider, _) = search(Reply::Candidates(vec![
        named("Completely Different", "Nobody", Some("[00:01.00]wrong"), None),
        named("Song", "Artist", None, Some("right words")),
    ]));
    let resolver =
        LyricsResolver::with_config(ResolverConfig::default()).with_search_provider(search_provider);

    let query = LyricsQuery::new("Song (Official Video)", "Artist feat. Someone");
    let result = resolver.get_lyrics_with_source(&query).await.unwrap();

    assert!(!result.parsed.is_synced);
    assert_eq!(result.text, "right words");
}

#[tokio::test]
async fn test_unknown_duration_rejects_weak_names() {
    let (search_provider, _) = search(Reply::Candidates(vec![named(
        "Completely Different",
        "Nobody",
        Some("[00:01.00]wrong"),
        None,
    )]));
    let resolver =
        LyricsResolver::with_config(ResolverConfig::default()).with_search_provider(search_provider);

    let query = LyricsQuery::new("Song", "Artist").with_duration_secs(-1);
    assert!(matches!(
        resolver.get_lyrics(&query).await,
        Err(LyricsResolverError::Unavailable)
    ));
}

// ==========================================================
//  聚合
// ==========================================================

#[tokio::test]
async fn test_aggregate_dedups_across_providers_and_caps_total() {
    let shared = "[00:01.00]shared synced";
    let (markup_provider, _) = markup(Some(SIMPLE_TTML));
    let (video_provider, _) = video(Reply::Candidates(vec![
        candidate("v1", 200.0, Some(shared), None),
        candidate("v2", 200.0, Some("[00:01.00]video synced"), Some("video plain")),
    ]));
    let (search_provider, _) = search(Reply::Candidates(vec![
        candidate("s1", 200.0, Some(shared), Some("search plain 1")),
        candidate("s2", 200.0, Some("[00:01.00]search synced 2"), Some("search plain 2")),
        candidate("s3", 200.0, None, Some("search plain 3")),
        candidate("s4", 200.0, Some("[00:01.00]search synced 4"), None),
    ]));
    let resolver = LyricsResolver::with_config(ResolverConfig::default())
        .with_markup_provider(markup_provider)
        .with_video_provider(video_provider)
        .with_search_provider(search_provider);

    let results = resolver
        .get_all_lyrics(&query().with_video_id("id"))
        .await;

    assert_eq!(results.len(), 5, "所有提供商合计最多 5 条");

    let texts: Vec<&str> = results.iter().map(|r| r.text.as_str()).collect();
    assert_eq!(
        texts.iter().filter(|t| **t == shared).count(),
        1,
        "重复的歌词只保留第一次出现"
    );
    assert!(!texts.contains(&"video plain"), "有同步歌词的候选项不再提供纯文本");
    assert!(
        !texts.contains(&"search plain 1"),
        "最佳歌词重复时不退回到同一候选项的纯文本"
    );

    let providers: Vec<&str> = results.iter().map(|r| r.provider_name.as_str()).collect();
    assert_eq!(
        providers,
        vec![MARKUP_NAME, VIDEO_NAME, VIDEO_NAME, SEARCH_NAME, SEARCH_NAME]
    );
    assert_eq!(results[3].text, "[00:01.00]search synced 2");
    assert_eq!(results[4].text, "search plain 3");
}

#[tokio::test]
async fn test_aggregate_offers_one_result_per_candidate() {
    let (search_provider, _) = search(Reply::Candidates(vec![candidate(
        "s1",
        200.0,
        Some("[00:01.00]synced words"),
        Some("plain words"),
    )]));
    let resolver =
        LyricsResolver::with_config(ResolverConfig::default()).with_search_provider(search_provider);

    let results = resolver.get_all_lyrics(&query()).await;

    assert_eq!(results.len(), 1);
    assert!(results[0].parsed.is_synced);
    assert_eq!(results[0].text, "[00:01.00]synced words");
}

#[tokio::test]
async fn test_aggregate_limits_plain_results_per_provider() {
    let (search_provider, _) = search(Reply::Candidates(vec![
        candidate("s1", 200.0, Some("[00:01.00]synced 1"), Some("plain 1")),
        candidate("s2", 201.0, None, Some("plain 2")),
        candidate("s3", 202.0, None, Some("plain 3")),
        candidate("s4", 203.0, Some("[00:01.00]synced 4"), None),
    ]));
    let resolver =
        LyricsResolver::with_config(ResolverConfig::default()).with_search_provider(search_provider);

    let results = resolver.get_all_lyrics(&query()).await;

    let plain: Vec<&str> = results
        .iter()
        .filter(|r| !r.parsed.is_synced)
        .map(|r| r.text.as_str())
        .collect();
    assert_eq!(plain, vec!["plain 2"], "每个提供商最多一条纯文本歌词");

    let synced: Vec<&str> = results
        .iter()
        .filter(|r| r.parsed.is_synced)
        .map(|r| r.text.as_str())
        .collect();
    assert_eq!(
        synced,
        vec!["[00:01.00]synced 1", "[00:01.00]synced 4"],
        "同步歌词不受纯文本上限影响"
    );
}

#[tokio::test]
async fn test_aggregate_filters_by_name_when_duration_unknown() {
    let (search_provider, _) = search(Reply::Candidates(vec![
        named("Totally Unrelated", "Nobody", Some("[00:01.00]wrong song"), None),
        named("Song", "Artist", None, Some("right song")),
    ]));
    let resolver =
        LyricsResolver::with_config(ResolverConfig::default()).with_search_provider(search_provider);

    let results = resolver
        .get_all_lyrics(&LyricsQuery::new("Song", "Artist"))
        .await;

    assert_eq!(results.len(), 1, "名称不相符的候选项应被过滤");
    assert_eq!(results[0].text, "right song");
}

#[tokio::test]
async fn test_aggregate_without_duration_drops_unrelated_names() {
    let (search_provider, _) = search(Reply::Candidates(vec![named(
        "Totally Unrelated",
        "Nobody",
        Some("[00:01.00]wrong song"),
        Some("wrong plain"),
    )]));
    let resolver =
        LyricsResolver::with_config(ResolverConfig::default()).with_search_provider(search_provider);

    let results = resolver
        .get_all_lyrics(&LyricsQuery::new("Song", "Artist"))
        .await;

    assert!(results.is_empty());
}

#[tokio::test]
async fn test_aggregate_rejects_texts_without_lines() {
    let (search_provider, _) = search(Reply::Candidates(vec![
        candidate("s1", 200.0, Some("intro [00:01.00] mid-line only"), Some("plain fallback")),
        candidate("s2", 200.0, Some("intro [00:02.00] mid-line only"), None),
    ]));
    let resolver =
        LyricsResolver::with_config(ResolverConfig::default()).with_search_provider(search_provider);

    let results = resolver.get_all_lyrics(&query()).await;

    assert_eq!(results.len(), 1, "解析不出任何行的歌词不应被收集");
    assert_eq!(results[0].text, "plain fallback");
    assert!(!results[0].parsed.is_synced);
    assert!(!results[0].parsed.lines.is_empty());
}

#[tokio::test]
async fn test_aggregate_skips_candidates_outside_tolerance() {
    let (search_provider, _) = search(Reply::Candidates(vec![
        candidate("far", 260.0, Some("[00:01.00]far away"), None),
        candidate("near", 203.0, Some("[00:01.00]close enough"), None),
    ]));
    let resolver =
        LyricsResolver::with_config(ResolverConfig::default()).with_search_provider(search_provider);

    let results = resolver.get_all_lyrics(&query()).await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].parsed.lines[0].text, "close enough");
}

#[tokio::test]
async fn test_aggregate_dedup_uses_text_prefix() {
    let body = "a".repeat(120);
    let first = format!("[00:01.00]{body}x");
    let second = format!("[00:01.00]{body}y");
    let (search_provider, _) = search(Reply::Candidates(vec![
        candidate("s1", 200.0, Some(first.as_str()), None),
        candidate("s2", 200.0, Some(second.as_str()), None),
    ]));
    let resolver =
        LyricsResolver::with_config(ResolverConfig::default()).with_search_provider(search_provider);

    let results = resolver.get_all_lyrics(&query()).await;

    assert_eq!(results.len(), 1, "前缀相同的歌词视为重复");
    assert_eq!(results[0].text, first);
}

#[tokio::test]
async fn test_aggregate_survives_provider_failure() {
    let (video_provider, video_calls) = video(Reply::Fail);
    let (search_provider, _) = search(Reply::Candidates(vec![candidate(
        "s1",
        200.0,
        Some("[00:01.00]still here"),
        None,
    )]));
    let resolver = LyricsResolver::with_config(ResolverConfig::default())
        .with_video_provider(video_provider)
        .with_search_provider(search_provider);

    let results = resolver.get_all_lyrics(&query().with_video_id("id")).await;

    assert_eq!(video_calls.load(Ordering::SeqCst), 1);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].provider_name, SEARCH_NAME);
}
