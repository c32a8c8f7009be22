use {
    serde::Serialize,
    pilkada_sentiment_core::{
        corpus::Corpus,
        entity::{Post, SentimentLabel},
    },
    crate::{
        counter::FrequencyCounter,
        ngram::strip_list_artifacts,
    },
};

#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SentimentCounts {
    pub total: usize,
    pub positif: usize,
    pub netral: usize,
    pub negatif: usize,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct EntitySentimentCount {
    pub entity: String,
    pub positif: usize,
    pub netral: usize,
    pub negatif: usize,
    pub total: usize,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct WordFrequency {
    pub word: String,
    pub frequency: usize,
}

impl SentimentCounts {
    fn add(&mut self, label: SentimentLabel) {
        self.total += 1;
        match label {
            SentimentLabel::Positif => self.positif += 1,
            SentimentLabel::Netral => self.netral += 1,
            SentimentLabel::Negatif => self.negatif += 1,
        }
    }
}

pub fn sentiment_counts(corpus: &Corpus) -> SentimentCounts {
    let mut counts = SentimentCounts::default();
    corpus.iter().for_each(|post| counts.add(post.sentiment()));
    counts
}

/// Per-candidate label counts, largest candidates first.
pub fn sentiment_distribution(corpus: &Corpus) -> Vec<EntitySentimentCount> {
    let mut entities: Vec<(&str, SentimentCounts)> = Vec::new();

    for post in corpus.iter() {
        let position = match entities.iter().position(|(entity, _)| *entity == post.entity()) {
            Some(position) => position,
            None => {
                entities.push((post.entity(), SentimentCounts::default()));
                entities.len() - 1
            },
        };
        entities[position].1.add(post.sentiment());
    }

    entities.sort_by(|a, b| b.1.total.cmp(&a.1.total));

    entities.into_iter()
        .map(|(entity, counts)| EntitySentimentCount {
            entity: entity.to_owned(),
            positif: counts.positif,
            netral: counts.netral,
            negatif: counts.negatif,
            total: counts.total,
        })
        .collect()
}

/// Word-cloud input: stemmed token counts of one candidate's posts with one label.
pub fn word_frequencies(corpus: &Corpus, entity: &str, label: SentimentLabel) -> Vec<WordFrequency> {
    let cleaned: Vec<String> = corpus.for_entity(entity)
        .filter(|post| post.sentiment() == label)
        .map(|post| strip_list_artifacts(post.normalized_tokens()))
        .collect();

    let counts: FrequencyCounter<&str> = cleaned.iter().flat_map(|v| v.split_whitespace()).collect();

    counts.into_sorted()
        .into_iter()
        .map(|(word, frequency)| WordFrequency {
            word: word.to_owned(),
            frequency,
        })
        .collect()
}

/// Case-insensitive match on post text or username. A blank query matches everything.
pub fn search<'a>(corpus: &'a Corpus, query: &str) -> Vec<&'a Post> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return corpus.iter().collect();
    }

    corpus.iter()
        .filter(|post| post.text().to_lowercase().contains(&query) || post.username().to_lowercase().contains(&query))
        .collect()
}
