mod analytics;
mod predict;
mod utils;

use {
    std::path::PathBuf,
    anyhow::{Context, Result},
    clap::{Parser, Subcommand},
    tracing::{info, warn},
    pilkada_sentiment_core::{
        config::Config,
        entity::{SentimentFilter, SentimentLabel},
    },
    pilkada_sentiment_nlp::ngram::NGramSize,
    crate::{
        analytics::{hashtags_step, ngrams_step, search_step, summary_step, words_step},
        predict::predict_step,
        utils::init_logging,
    },
};

/// Sentiment analysis of social media posts about the East Java gubernatorial candidates.
#[derive(Parser, Debug)]
#[command(name = "pilkada-sentiment", version)]
struct Cli {
    /// Config file; ./config.toml or /config/config.toml when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Normalize and classify posts, one JSON line per post
    Predict {
        #[arg(required = true)]
        texts: Vec<String>,
    },
    /// Most frequent n-grams of one candidate, split by sentiment
    Ngrams {
        #[arg(long)]
        entity: Option<String>,
        /// All, Positif, Netral or Negatif
        #[arg(long)]
        sentiment: Option<SentimentFilter>,
        /// unigram, bigram or trigram
        #[arg(long, default_value = "unigram")]
        ngram: NGramSize,
        #[arg(long)]
        top: Option<usize>,
    },
    /// Hashtag frequencies
    Hashtags {
        #[arg(long, default_value = "All")]
        sentiment: SentimentFilter,
        #[arg(long)]
        entity: Option<String>,
    },
    /// Label counts, overall and per candidate
    Summary,
    /// Word frequencies of one candidate and one label
    Words {
        #[arg(long)]
        entity: Option<String>,
        #[arg(long)]
        sentiment: SentimentLabel,
    },
    /// Posts whose text or username contains the query
    Search {
        #[arg(default_value = "")]
        query: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, fallback) = match &cli.config {
        Some(path) => {
            let config = Config::load_from(path).with_context(|| format!("failed to read config from {}", path.display()))?;
            (config, None)
        },
        None => Config::load(),
    };
    init_logging(&config.logging);

    if let Some(err) = fallback {
        warn!("failed to read config, using defaults: {}", err);
    }

    info!("running {:?}", cli.command);

    match cli.command {
        Command::Predict { texts } => predict_step(&config, &texts),
        Command::Ngrams { entity, sentiment, ngram, top } => ngrams_step(&config, entity, sentiment, ngram, top),
        Command::Hashtags { sentiment, entity } => hashtags_step(&config, sentiment, entity),
        Command::Summary => summary_step(&config),
        Command::Words { entity, sentiment } => words_step(&config, entity, sentiment),
        Command::Search { query } => search_step(&config, &query),
    }
}
