use std::cmp::Ordering;

use serde::Serialize;
use tracing::debug;

use crate::{
    error::Result,
    intent::{
        DEFAULT_INTENTS,
        IntentDictionary,
        expand_by_intent,
        intent_supports_os,
        resolve_intent,
    },
    model::Guide,
    text_util::{char_len, levenshtein, normalize},
};

pub const DEFAULT_MAX_DISTANCE: usize = 2;
pub const DEFAULT_LIMIT: usize = 20;

/// Maximum number of keyword suggestions offered when nothing matched.
const MAX_SUGGESTIONS: usize = 5;

/// Shown when the query normalizes to nothing.
pub const EMPTY_QUERY_PROMPT: &str = "Bitte gib einen Suchbegriff ein.";

/// Shown when nothing matched and no keyword shares the query's prefix.
pub const FALLBACK_HINTS: [&str; 2] = [
    "Versuche ein anderes Wort wie \"Screenshot\" oder \"Update\".",
    "Nutze den Namen des Geräts, z. B. \"iPad\" oder \"Windows\".",
];

/// Tuning knobs for [`search_how_tos`].
#[derive(Debug, Clone, Copy)]
pub struct SearchOptions<'a> {
    /// Largest edit distance at which a term still matches a token.
    pub max_distance: usize,
    /// Maximum number of results returned.
    pub limit: usize,
    pub dictionary: &'a IntentDictionary,
}

impl Default for SearchOptions<'_> {
    fn default() -> Self {
        Self {
            max_distance: DEFAULT_MAX_DISTANCE,
            limit: DEFAULT_LIMIT,
            dictionary: &DEFAULT_INTENTS,
        }
    }
}

/// A ranked guide with the tokens that matched.
#[derive(Debug, Clone, Serialize)]
pub struct SearchMatch<'a> {
    #[serde(rename = "howTo")]
    pub guide: &'a Guide,
    pub score: f64,
    pub matches: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse<'a> {
    pub normalized_query: String,
    pub items: Vec<SearchMatch<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
    pub suggestions: Vec<String>,
}

/// How a response should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    Hits,
    EmptyQuery,
    NoMatch,
}

impl SearchResponse<'_> {
    pub fn outcome(&self) -> SearchOutcome {
        if !self.items.is_empty() {
            SearchOutcome::Hits
        } else if self.normalized_query.is_empty() {
            SearchOutcome::EmptyQuery
        } else {
            SearchOutcome::NoMatch
        }
    }
}

/// Search the corpus for guides matching `query`.
///
/// 1. Normalize the query; an empty query yields the input prompt
/// 2. Resolve its intent and drop guides for OS families the intent
///    does not support
/// 3. Expand the query with the intent's synonyms
/// 4. Score each guide by its best (term, token) pair
/// 5. Rank by score, then by shorter estimated time
/// 6. Fall back to keyword suggestions when nothing matched
pub fn search_how_tos<'a>(
    query: &str,
    guides: &'a [Guide],
    options: &SearchOptions<'_>,
) -> SearchResponse<'a> {
    let normalized_query = normalize(query);

    if normalized_query.is_empty() {
        return SearchResponse {
            normalized_query,
            items: Vec::new(),
            intent: None,
            suggestions: vec![EMPTY_QUERY_PROMPT.to_string()],
        };
    }

    let resolution = resolve_intent(&normalized_query, options.dictionary);
    let terms = expand_by_intent(&normalized_query, options.dictionary);

    let mut items: Vec<SearchMatch<'a>> = guides
        .iter()
        .filter(|guide| {
            resolution
                .as_ref()
                .is_none_or(|r| intent_supports_os(&r.intent, guide.os))
        })
        .filter_map(|guide| {
            let tokens = collect_tokens(guide);
            let (score, matches) =
                evaluate_match(&terms, &tokens, options.max_distance)?;
            Some(SearchMatch {
                guide,
                score,
                matches,
            })
        })
        .collect();

    // Stable sort keeps corpus order for full ties.
    items.sort_by(|a, b| {
        b.score.total_cmp(&a.score).then_with(|| {
            a.guide
                .estimated_minutes
                .partial_cmp(&b.guide.estimated_minutes)
                .unwrap_or(Ordering::Equal)
        })
    });
    items.truncate(options.limit);

    let intent = resolution.map(|r| r.intent);
    debug!(
        query = %normalized_query,
        terms = terms.len(),
        hits = items.len(),
        intent = intent.as_deref().unwrap_or("-"),
        "search finished"
    );

    let suggestions = if items.is_empty() {
        build_suggestions(&normalized_query, guides)
    } else {
        Vec::new()
    };

    SearchResponse {
        normalized_query,
        items,
        intent,
        suggestions,
    }
}

/// Best pair score across all (term, token) pairs, with the tokens that
/// scored. Returns `None` when nothing scored above zero.
fn evaluate_match(
    terms: &[String],
    tokens: &[String],
    max_distance: usize,
) -> Option<(f64, Vec<String>)> {
    let mut best = 0.0_f64;
    let mut matched: Vec<String> = Vec::new();

    for term in terms {
        let term_len = char_len(term);
        for token in tokens {
            let distance = levenshtein(term, token);
            let contained = token.contains(term.as_str());
            if distance > max_distance && !contained {
                continue;
            }

            let longest = term_len.max(char_len(token)).max(1);
            let similarity = 1.0 - distance as f64 / longest as f64;
            let score =
                similarity.max(if contained { 1.0 } else { similarity });
            if score > 0.0 {
                best = best.max(score);
                if !matched.contains(token) {
                    matched.push(token.clone());
                }
            }
        }
    }

    (best > 0.0).then(|| (round4(best), matched))
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Normalized title, summary, keywords and step titles, de-duplicated.
fn collect_tokens(guide: &Guide) -> Vec<String> {
    let fields = [guide.title.as_str(), guide.summary.as_str()]
        .into_iter()
        .chain(guide.keywords.iter().map(String::as_str))
        .chain(guide.steps.iter().map(|step| step.title.as_str()));

    let mut tokens: Vec<String> = Vec::new();
    for field in fields {
        let token = normalize(field);
        if !token.is_empty() && !tokens.contains(&token) {
            tokens.push(token);
        }
    }
    tokens
}

/// Keywords sharing the query's first two characters, or generic hints.
fn build_suggestions(normalized_query: &str, guides: &[Guide]) -> Vec<String> {
    let prefix: String = normalized_query.chars().take(2).collect();
    let mut suggestions: Vec<String> = Vec::new();

    'guides: for guide in guides {
        for keyword in &guide.keywords {
            if normalize(keyword).starts_with(&prefix)
                && !suggestions.contains(keyword)
            {
                suggestions.push(keyword.clone());
            }
            if suggestions.len() >= MAX_SUGGESTIONS {
                break 'guides;
            }
        }
    }

    if suggestions.is_empty() {
        FALLBACK_HINTS.iter().map(|hint| hint.to_string()).collect()
    } else {
        suggestions
    }
}

/// Format a response for human-readable terminal output.
pub fn format_human(response: &SearchResponse<'_>) {
    match response.outcome() {
        SearchOutcome::Hits => {
            for (i, item) in response.items.iter().enumerate() {
                println!(
                    "{:>3}. [{:.3}] {} ({}, {} min)",
                    i + 1,
                    item.score,
                    item.guide.title,
                    item.guide.os,
                    item.guide.estimated_minutes
                );
                println!("     /howto/{}", item.guide.slug);
            }
            println!("\n{} Treffer", response.items.len());
        }
        SearchOutcome::EmptyQuery => {
            for suggestion in &response.suggestions {
                println!("{suggestion}");
            }
        }
        SearchOutcome::NoMatch => {
            println!("Keine Treffer gefunden.");
            for suggestion in &response.suggestions {
                println!("  - {suggestion}");
            }
        }
    }
    if let Some(intent) = &response.intent {
        println!("Absicht: {intent}");
    }
}

/// Format a response as JSON output.
pub fn format_json(response: &SearchResponse<'_>) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(response)?);
    Ok(())
}
