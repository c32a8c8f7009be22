use {
    serde::Serialize,
    tracing::info,
    pilkada_sentiment_core::{
        corpus::Corpus,
        entity::SentimentFilter,
    },
    crate::counter::FrequencyCounter,
};

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct HashtagRecord {
    pub tag: String,
    pub frequency: usize,
}

/// Counts hashtags of the posts matching `sentiment` and, when given, `entity`.
///
/// Tags are compared without their leading `#`. Most frequent first, ties in the
/// order the tags were first seen. No tags at all is a normal, empty result.
pub fn hashtag_frequency(corpus: &Corpus, sentiment: SentimentFilter, entity: Option<&str>) -> Vec<HashtagRecord> {
    let counts: FrequencyCounter<&str> = corpus.iter()
        .filter(|post| sentiment.matches(post.sentiment()))
        .filter(|post| entity.map(|entity| post.entity() == entity).unwrap_or(true))
        .flat_map(|post| post.hashtags())
        .map(|tag| tag.trim_start_matches('#'))
        .filter(|tag| !tag.is_empty())
        .collect();

    if counts.is_empty() {
        info!("no hashtags for {} posts of {}", sentiment, entity.unwrap_or("all candidates"));
        return Vec::new();
    }

    counts.into_sorted()
        .into_iter()
        .map(|(tag, frequency)| HashtagRecord {
            tag: tag.to_owned(),
            frequency,
        })
        .collect()
}
