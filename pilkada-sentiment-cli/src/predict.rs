use {
    anyhow::{Context, Result},
    serde::Serialize,
    tracing::info,
    pilkada_sentiment_core::{
        config::Config,
        dictionary::{RootWords, SlangDictionary, StopwordSet},
        entity::SentimentLabel,
    },
    pilkada_sentiment_nlp::{
        classifier::{Confidence, FittedSentimentClassifier},
        model::ModelArtifacts,
        normalizer::{Normalized, TextNormalizer},
        stemmer::AffixStemmer,
    },
};

#[derive(Serialize, Debug)]
#[serde(tag = "status", rename_all = "snake_case")]
enum PredictOutput<'a> {
    Classified {
        text: &'a str,
        normalized: &'a str,
        label: SentimentLabel,
        confidence: &'a [Confidence],
    },
    Unclassifiable {
        text: &'a str,
        reason: &'static str,
    },
}

pub fn build_normalizer(config: &Config) -> Result<TextNormalizer<AffixStemmer>> {
    let resources = &config.resources;

    let dictionary_path = resources.normalization_dictionary();
    let slang = SlangDictionary::load_csv(&dictionary_path)
        .with_context(|| format!("failed to load slang dictionary from {}", dictionary_path.display()))?
        .with_manual_overrides()
        .with_overrides(resources.slang_overrides().clone());

    let root_words_path = resources.root_words();
    let roots = RootWords::load(&root_words_path)
        .with_context(|| format!("failed to load root words from {}", root_words_path.display()))?;

    let stopwords = StopwordSet::indonesian(resources.extra_stopwords());

    info!(
        "normalizer ready: {} slang entries, {} stopwords, {} root words",
        slang.len(),
        stopwords.len(),
        roots.len(),
    );

    Ok(TextNormalizer::new(slang, stopwords, AffixStemmer::new(roots)))
}

pub fn build_classifier(config: &Config) -> Result<FittedSentimentClassifier> {
    let artifacts = ModelArtifacts::load(&config.model()).context("failed to load model artifacts")?;
    Ok(FittedSentimentClassifier::from_artifacts(artifacts))
}

pub fn predict_step(config: &Config, texts: &[String]) -> Result<()> {
    // everything is loaded before the first post is normalized
    let normalizer = build_normalizer(config)?;
    let classifier = build_classifier(config)?;

    for text in texts {
        let line = match normalizer.normalize(text) {
            Normalized::Text(normalized) => {
                let prediction = classifier.predict(&normalized)
                    .with_context(|| format!("failed to classify {:?}", text))?;

                serde_json::to_string(&PredictOutput::Classified {
                    text,
                    normalized: normalized.as_str(),
                    label: prediction.label(),
                    confidence: prediction.confidence(),
                })?
            },
            Normalized::Empty => {
                info!("nothing left of {:?} after normalization", text);
                serde_json::to_string(&PredictOutput::Unclassifiable {
                    text,
                    reason: "text cannot be classified: nothing is left after normalization",
                })?
            },
        };

        println!("{}", line);
    }

    Ok(())
}
