use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::models::Feedback;

/// Alphabetic tokens of length >= 4 on word boundaries. Note that `\b`
/// means letters glued to digits or underscores do not match, matching the
/// display behavior the summary page always had.
static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[a-zA-Z]{4,}\b").expect("keyword pattern is valid"));

/// Generic filler words excluded from the keyword list.
const STOPWORDS: [&str; 9] = [
    "this", "that", "with", "have", "your", "about", "from", "what", "which",
];

const TOP_EMOJIS: usize = 3;
const TOP_KEYWORDS: usize = 10;

/// Frequency counter that remembers first-encounter order, so top-N output
/// is deterministic under ties instead of depending on hash iteration.
#[derive(Debug, Default)]
pub struct StableCounter {
    entries: Vec<(String, i64)>,
    index: HashMap<String, usize>,
}

impl StableCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, key: &str) {
        match self.index.get(key) {
            Some(&at) => self.entries[at].1 += 1,
            None => {
                self.index.insert(key.to_owned(), self.entries.len());
                self.entries.push((key.to_owned(), 1));
            }
        }
    }

    /// Top `n` by count. The sort is stable, so ties keep encounter order.
    pub fn most_common(self, n: usize) -> Vec<(String, i64)> {
        let mut entries = self.entries;
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries.truncate(n);
        entries
    }
}

/// Aggregated view of one event's feedback, recomputed from the full set on
/// every request. Pure: repeated calls over the same records give identical
/// output and mutate nothing.
#[derive(Debug, Serialize)]
pub struct FeedbackSummary {
    /// (minute label, count), ascending by label.
    pub feedback_volume: Vec<(String, i64)>,
    /// (emoji, count), top 3, ties by first encounter.
    pub top_emojis: Vec<(String, i64)>,
    /// Top 10 comment keywords, same tie-break.
    pub keywords: Vec<String>,
}

pub fn summarize(feedback: &[Feedback]) -> FeedbackSummary {
    FeedbackSummary {
        feedback_volume: volume_by_minute(feedback),
        top_emojis: top_emojis(feedback),
        keywords: keywords(feedback),
    }
}

/// Buckets feedback timestamps by minute. BTreeMap keys come out sorted,
/// which for `%Y-%m-%d %H:%M` labels is chronological order.
pub fn volume_by_minute(feedback: &[Feedback]) -> Vec<(String, i64)> {
    let mut buckets: BTreeMap<String, i64> = BTreeMap::new();
    for entry in feedback {
        let label = entry.created_at.format("%Y-%m-%d %H:%M").to_string();
        *buckets.entry(label).or_insert(0) += 1;
    }
    buckets.into_iter().collect()
}

pub fn top_emojis(feedback: &[Feedback]) -> Vec<(String, i64)> {
    let mut counter = StableCounter::new();
    for entry in feedback {
        counter.increment(&entry.emoji);
    }
    counter.most_common(TOP_EMOJIS)
}

pub fn keywords(feedback: &[Feedback]) -> Vec<String> {
    let mut counter = StableCounter::new();
    for entry in feedback {
        if entry.comment.is_empty() {
            continue;
        }
        let lowered = entry.comment.to_lowercase();
        for word in WORD_RE.find_iter(&lowered) {
            let word = word.as_str();
            if !STOPWORDS.contains(&word) {
                counter.increment(word);
            }
        }
    }
    counter
        .most_common(TOP_KEYWORDS)
        .into_iter()
        .map(|(word, _)| word)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use uuid::Uuid;

    fn entry(emoji: &str, comment: &str, at: &str) -> Feedback {
        Feedback {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            emoji: emoji.to_owned(),
            comment: comment.to_owned(),
            pinned: false,
            flagged: false,
            created_at: at.parse::<DateTime<Utc>>().expect("valid timestamp"),
        }
    }

    #[test]
    fn test_top_emojis_counts_and_truncates() {
        let feed: Vec<Feedback> = ["👍", "👍", "😀", "👍", "😀"]
            .iter()
            .map(|e| entry(e, "", "2025-06-01T18:00:00Z"))
            .collect();
        assert_eq!(
            top_emojis(&feed),
            vec![("👍".to_owned(), 3), ("😀".to_owned(), 2)]
        );
    }

    #[test]
    fn test_emoji_ties_break_by_first_encounter() {
        let feed: Vec<Feedback> = ["🎉", "👍", "🎉", "👍", "🔥"]
            .iter()
            .map(|e| entry(e, "", "2025-06-01T18:00:00Z"))
            .collect();
        assert_eq!(
            top_emojis(&feed),
            vec![
                ("🎉".to_owned(), 2),
                ("👍".to_owned(), 2),
                ("🔥".to_owned(), 1)
            ]
        );
    }

    #[test]
    fn test_volume_buckets_by_minute_ascending() {
        let feed = vec![
            entry("👍", "", "2025-06-01T18:02:10Z"),
            entry("👍", "", "2025-06-01T18:01:59Z"),
            entry("👍", "", "2025-06-01T18:02:40Z"),
        ];
        assert_eq!(
            volume_by_minute(&feed),
            vec![
                ("2025-06-01 18:01".to_owned(), 1),
                ("2025-06-01 18:02".to_owned(), 2),
            ]
        );
    }

    #[test]
    fn test_keywords_drop_stopwords_and_short_tokens() {
        let feed = vec![entry(
            "👍",
            "this was fun with catering from your team",
            "2025-06-01T18:00:00Z",
        )];
        // "this"/"with"/"from"/"your" are stopwords, "was"/"fun" too short.
        assert_eq!(
            keywords(&feed),
            vec!["catering".to_owned(), "team".to_owned()]
        );
    }

    #[test]
    fn test_keywords_lowercase_filter_and_rank() {
        let feed = vec![
            entry("👍", "Great talk, really GREAT demos", "2025-06-01T18:00:00Z"),
            entry("😀", "this demo was great fun", "2025-06-01T18:01:00Z"),
        ];
        let words = keywords(&feed);
        // "great" three times, then first-encounter order for the ties.
        assert_eq!(
            words,
            vec![
                "great".to_owned(),
                "talk".to_owned(),
                "really".to_owned(),
                "demos".to_owned(),
                "demo".to_owned(),
            ]
        );
    }

    #[test]
    fn test_keyword_tokens_respect_word_boundaries() {
        let feed = vec![entry("👍", "room42 wifi4all solid", "2025-06-01T18:00:00Z")];
        // Letters glued to digits sit inside a word run, so `\b` never
        // fires around them; only the clean token survives.
        assert_eq!(keywords(&feed), vec!["solid".to_owned()]);
    }

    #[test]
    fn test_summary_is_pure_across_repeated_calls() {
        let feed = vec![
            entry("👍", "lovely venue", "2025-06-01T18:00:00Z"),
            entry("😀", "lovely crowd", "2025-06-01T18:00:30Z"),
        ];
        let first = summarize(&feed);
        let second = summarize(&feed);
        assert_eq!(first.feedback_volume, second.feedback_volume);
        assert_eq!(first.top_emojis, second.top_emojis);
        assert_eq!(first.keywords, second.keywords);
    }
}
