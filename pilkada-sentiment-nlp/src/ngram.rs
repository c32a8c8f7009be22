use {
    std::{collections::HashMap, fmt, str::FromStr},
    once_cell::sync::Lazy,
    regex::Regex,
    serde::Serialize,
    tracing::info,
    pilkada_sentiment_core::{
        corpus::Corpus,
        entity::{Post, SentimentFilter, SentimentLabel},
        error::{Error, Result},
    },
    crate::counter::FrequencyCounter,
};

static LIST_ARTIFACTS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\[\]',]").unwrap());

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct NGramRecord {
    pub phrase: String,
    pub group: SentimentLabel,
    pub frequency: usize,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PhraseTotal {
    pub phrase: String,
    pub frequency: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NGramSize {
    Unigram,
    Bigram,
    Trigram,
}

impl NGramSize {
    pub fn width(&self) -> usize {
        match self {
            NGramSize::Unigram => 1,
            NGramSize::Bigram => 2,
            NGramSize::Trigram => 3,
        }
    }
}

impl TryFrom<usize> for NGramSize {
    type Error = Error;

    fn try_from(n: usize) -> Result<Self> {
        match n {
            1 => Ok(NGramSize::Unigram),
            2 => Ok(NGramSize::Bigram),
            3 => Ok(NGramSize::Trigram),
            other => Err(Error::InvalidArgument(format!("n-gram width must be 1, 2 or 3, got {}", other))),
        }
    }
}

impl FromStr for NGramSize {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "unigram" => Ok(NGramSize::Unigram),
            "bigram" => Ok(NGramSize::Bigram),
            "trigram" => Ok(NGramSize::Trigram),
            other => other.parse::<usize>()
                .map_err(|_| Error::InvalidArgument(format!("n-gram must be unigram, bigram or trigram, got {}", s)))
                .and_then(NGramSize::try_from),
        }
    }
}

impl fmt::Display for NGramSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NGramSize::Unigram => "unigram",
            NGramSize::Bigram => "bigram",
            NGramSize::Trigram => "trigram",
        })
    }
}

/// Removes the `[`, `]`, `'` and `,` left over from the stored token lists.
pub fn strip_list_artifacts(tokens: &str) -> String {
    LIST_ARTIFACTS.replace_all(tokens, "").into_owned()
}

/// Per-sentiment n-gram counts for the `top_n` phrases of one entity.
///
/// Rows of each sentiment group are concatenated into one token stream before the
/// window slides, so phrases can span two posts. Phrases are ranked by their count
/// summed over all groups; equal sums keep the order in which the phrases were first
/// seen (groups in Positif, Netral, Negatif order). Records come back ranked, and
/// within a phrase in group order.
pub fn top_ngrams(corpus: &Corpus, entity: &str, sentiment: SentimentFilter, n: usize, top_n: usize) -> Result<Vec<NGramRecord>> {
    let width = NGramSize::try_from(n)?.width();

    let rows: Vec<&Post> = corpus.for_entity(entity)
        .filter(|post| sentiment.matches(post.sentiment()))
        .collect();

    let mut records = Vec::new();
    let mut totals = FrequencyCounter::new();

    for label in sentiment.labels() {
        let cleaned: Vec<String> = rows.iter()
            .filter(|post| post.sentiment() == label)
            .map(|post| strip_list_artifacts(post.normalized_tokens()))
            .collect();
        let tokens: Vec<&str> = cleaned.iter().flat_map(|v| v.split_whitespace()).collect();

        let counts: FrequencyCounter<String> = tokens.windows(width).map(|window| window.join(" ")).collect();

        for (phrase, frequency) in counts.into_entries() {
            totals.add_count(phrase.clone(), frequency);
            records.push(NGramRecord {
                phrase,
                group: label,
                frequency,
            });
        }
    }

    if records.is_empty() {
        return Err(Error::EmptyResult);
    }

    let ranks: HashMap<String, usize> = totals.into_sorted()
        .into_iter()
        .take(top_n)
        .enumerate()
        .map(|(rank, (phrase, _))| (phrase, rank))
        .collect();

    records.retain(|record| ranks.contains_key(&record.phrase));
    records.sort_by_key(|record| ranks[&record.phrase]);

    info!(
        "{} top {} {}s for {} ({}) from {} rows",
        ranks.len(),
        top_n,
        NGramSize::try_from(n)?,
        entity,
        sentiment,
        rows.len(),
    );

    Ok(records)
}

/// Distinct phrases in display order with their summed frequency.
pub fn phrase_order(records: &[NGramRecord]) -> Vec<PhraseTotal> {
    let mut totals = FrequencyCounter::new();
    for record in records {
        totals.add_count(record.phrase.as_str(), record.frequency);
    }

    totals.into_entries()
        .into_iter()
        .map(|(phrase, frequency)| PhraseTotal {
            phrase: phrase.to_owned(),
            frequency,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(entity: &str, sentiment: SentimentLabel, tokens: &str) -> Post {
        Post::builder()
            .username("warga")
            .text(tokens)
            .entity(entity)
            .sentiment(sentiment)
            .normalized_tokens(tokens)
            .build()
    }

    fn scenario_corpus() -> Corpus {
        Corpus::new(vec![
            post("X", SentimentLabel::Positif, "['bagus', 'sekali']"),
            post("X", SentimentLabel::Positif, "['bagus', 'banget']"),
            post("X", SentimentLabel::Negatif, "['buruk', 'sekali']"),
            post("Y", SentimentLabel::Negatif, "['buruk', 'buruk', 'buruk']"),
        ])
    }

    fn record(phrase: &str, group: SentimentLabel, frequency: usize) -> NGramRecord {
        NGramRecord {
            phrase: phrase.to_owned(),
            group,
            frequency,
        }
    }

    #[test]
    fn rejects_unsupported_widths_before_scanning() {
        let corpus = Corpus::default();

        assert!(matches!(top_ngrams(&corpus, "X", SentimentFilter::All, 4, 10), Err(Error::InvalidArgument(_))));
        assert!(matches!(top_ngrams(&corpus, "X", SentimentFilter::All, 0, 10), Err(Error::InvalidArgument(_))));
        assert!(matches!(top_ngrams(&corpus, "X", SentimentFilter::All, 1, 10), Err(Error::EmptyResult)));
    }

    #[test]
    fn counts_unigrams() {
        let corpus = Corpus::new(vec![post("X", SentimentLabel::Netral, "a a b")]);

        let records = top_ngrams(&corpus, "X", SentimentFilter::All, 1, 10).unwrap();

        assert_eq!(records, vec![
            record("a", SentimentLabel::Netral, 2),
            record("b", SentimentLabel::Netral, 1),
        ]);
    }

    #[test]
    fn ranks_by_sum_across_groups() {
        let records = top_ngrams(&scenario_corpus(), "X", SentimentFilter::All, 1, 3).unwrap();

        assert_eq!(records, vec![
            record("bagus", SentimentLabel::Positif, 2),
            record("sekali", SentimentLabel::Positif, 1),
            record("sekali", SentimentLabel::Negatif, 1),
            record("banget", SentimentLabel::Positif, 1),
        ]);

        assert_eq!(phrase_order(&records), vec![
            PhraseTotal { phrase: "bagus".to_owned(), frequency: 2 },
            PhraseTotal { phrase: "sekali".to_owned(), frequency: 2 },
            PhraseTotal { phrase: "banget".to_owned(), frequency: 1 },
        ]);
    }

    #[test]
    fn top_n_keeps_the_most_frequent_phrases() {
        let corpus = Corpus::new(vec![
            post("X", SentimentLabel::Positif, "a b c a b a d e"),
            post("X", SentimentLabel::Netral, "e e d"),
            post("X", SentimentLabel::Negatif, "c c"),
        ]);

        let everything = phrase_order(&top_ngrams(&corpus, "X", SentimentFilter::All, 1, 100).unwrap());

        for k in 0..=everything.len() {
            let selected = phrase_order(&top_ngrams(&corpus, "X", SentimentFilter::All, 1, k).unwrap());
            assert!(selected.len() <= k);

            let lowest_selected = selected.iter().map(|v| v.frequency).min().unwrap_or(usize::MAX);
            let highest_excluded = everything.iter()
                .filter(|v| !selected.contains(v))
                .map(|v| v.frequency)
                .max()
                .unwrap_or(0);
            assert!(lowest_selected >= highest_excluded);
        }
    }

    #[test]
    fn sentiment_filter_limits_groups() {
        let records = top_ngrams(&scenario_corpus(), "X", SentimentFilter::Only(SentimentLabel::Negatif), 1, 10).unwrap();

        assert_eq!(records, vec![
            record("buruk", SentimentLabel::Negatif, 1),
            record("sekali", SentimentLabel::Negatif, 1),
        ]);
    }

    #[test]
    fn windows_span_posts_of_the_same_group() {
        let corpus = Corpus::new(vec![
            post("X", SentimentLabel::Positif, "['dukung', 'risma']"),
            post("X", SentimentLabel::Positif, "['menang']"),
        ]);

        let records = top_ngrams(&corpus, "X", SentimentFilter::All, 2, 10).unwrap();
        let phrases: Vec<&str> = records.iter().map(|v| v.phrase.as_str()).collect();

        assert_eq!(phrases, vec!["dukung risma", "risma menang"]);
    }

    #[test]
    fn too_few_tokens_is_an_empty_result() {
        let corpus = Corpus::new(vec![post("X", SentimentLabel::Positif, "['bagus', 'sekali']")]);

        assert!(matches!(top_ngrams(&corpus, "X", SentimentFilter::All, 3, 10), Err(Error::EmptyResult)));
        assert_eq!(top_ngrams(&corpus, "X", SentimentFilter::All, 2, 0).unwrap(), vec![]);
    }

    #[test]
    fn parses_sizes() {
        assert_eq!("bigram".parse::<NGramSize>().unwrap(), NGramSize::Bigram);
        assert_eq!("3".parse::<NGramSize>().unwrap(), NGramSize::Trigram);
        assert!("fourgram".parse::<NGramSize>().is_err());
        assert!("5".parse::<NGramSize>().is_err());
    }

    #[test]
    fn strips_stored_list_syntax() {
        assert_eq!(strip_list_artifacts("['bagus', 'sekali']"), "bagus sekali");
    }
}
