use {
    anyhow::{Context, Result},
    serde::Serialize,
    tracing::{info, warn},
    pilkada_sentiment_core::{
        config::{Config, MAX_TOP_NUMBER, MIN_TOP_NUMBER},
        corpus::Corpus,
        entity::{Post, SentimentFilter, SentimentLabel},
        error::Error,
    },
    pilkada_sentiment_nlp::{
        hashtag::hashtag_frequency,
        ngram::{NGramRecord, NGramSize, PhraseTotal, phrase_order, top_ngrams},
        summary::{search, sentiment_counts, sentiment_distribution, word_frequencies},
    },
};

#[derive(Serialize, Debug)]
struct NGramOutput<'a> {
    entity: &'a str,
    sentiment: String,
    ngram: String,
    top_number: usize,
    phrases: Vec<PhraseTotal>,
    records: Vec<NGramRecord>,
}

#[derive(Serialize, Debug)]
struct SearchOutput<'a> {
    query: &'a str,
    matches: usize,
    posts: Vec<&'a Post>,
}

pub fn load_corpus(config: &Config) -> Result<Corpus> {
    let path = config.resources.corpus();
    let corpus = Corpus::load(&path, &config.resources.entity_names())
        .with_context(|| format!("failed to load corpus from {}", path.display()))?;

    info!("loaded {} labeled posts from {}", corpus.len(), path.display());
    Ok(corpus)
}

pub fn ngrams_step(
    config: &Config,
    entity: Option<String>,
    sentiment: Option<SentimentFilter>,
    ngram: NGramSize,
    top_number: Option<usize>,
) -> Result<()> {
    let dashboard = config.dashboard();
    let entity = entity.unwrap_or_else(|| dashboard.entity());
    let sentiment = match sentiment {
        Some(sentiment) => sentiment,
        None => dashboard.sentiment_filter().context("invalid sentiment in dashboard config")?,
    };
    let top_number = match top_number {
        Some(requested) => {
            let clamped = requested.clamp(MIN_TOP_NUMBER, MAX_TOP_NUMBER);
            if clamped != requested {
                warn!("top number {} is outside {}..={}, using {}", requested, MIN_TOP_NUMBER, MAX_TOP_NUMBER, clamped);
            }
            clamped
        },
        None => dashboard.top_number(),
    };

    let corpus = load_corpus(config)?;

    let records = match top_ngrams(&corpus, &entity, sentiment, ngram.width(), top_number) {
        Ok(records) => records,
        Err(Error::EmptyResult) => {
            warn!("no {} data for {} ({})", ngram, entity, sentiment);
            Vec::new()
        },
        Err(err) => return Err(err).context("failed to count n-grams"),
    };

    print_json(&NGramOutput {
        entity: &entity,
        sentiment: sentiment.to_string(),
        ngram: ngram.to_string(),
        top_number,
        phrases: phrase_order(&records),
        records,
    })
}

pub fn hashtags_step(config: &Config, sentiment: SentimentFilter, entity: Option<String>) -> Result<()> {
    let corpus = load_corpus(config)?;
    print_json(&hashtag_frequency(&corpus, sentiment, entity.as_deref()))
}

pub fn summary_step(config: &Config) -> Result<()> {
    let corpus = load_corpus(config)?;

    print_json(&serde_json::json!({
        "labels": corpus.sentiment_labels(),
        "counts": sentiment_counts(&corpus),
        "distribution": sentiment_distribution(&corpus),
    }))
}

pub fn words_step(config: &Config, entity: Option<String>, sentiment: SentimentLabel) -> Result<()> {
    let entity = entity.unwrap_or_else(|| config.dashboard().entity());
    let corpus = load_corpus(config)?;

    let words = word_frequencies(&corpus, &entity, sentiment);
    if words.is_empty() {
        info!("no {} words for {}", sentiment, entity);
    }

    print_json(&words)
}

pub fn search_step(config: &Config, query: &str) -> Result<()> {
    let corpus = load_corpus(config)?;
    let posts = search(&corpus, query);

    print_json(&SearchOutput {
        query,
        matches: posts.len(),
        posts,
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
