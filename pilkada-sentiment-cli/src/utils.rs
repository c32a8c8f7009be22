use {
    std::io,
    tracing::{Level, warn},
    tracing_subscriber::{
        prelude::*,
        filter::filter_fn,
    },
    pilkada_sentiment_core::config::LoggingConfig,
};

const STEMMER_TARGET: &str = "pilkada_sentiment_nlp::stemmer";

pub fn init_logging(config: &LoggingConfig) {
    let parsed = config.level().parse::<Level>();
    let max_level = parsed.as_ref().map(|level| *level).unwrap_or(Level::INFO);

    // per-token stemmer events only at TRACE
    let filter = filter_fn(move |metadata| {
        if metadata.target().starts_with(STEMMER_TARGET) {
            metadata.level() <= &Level::INFO || max_level == Level::TRACE
        } else {
            true
        }
    });

    let builder = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(max_level)
        .with_writer(io::stderr);

    if config.json() {
        builder.json().finish().with(filter).init();
    } else {
        builder.finish().with(filter).init();
    }

    if let Err(err) = &parsed {
        warn!("unknown log level {:?} ({}), using {}", config.level(), err, max_level);
    }
}
