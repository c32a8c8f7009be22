pub mod classifier;
pub mod counter;
pub mod hashtag;
pub mod model;
pub mod ngram;
pub mod normalizer;
pub mod stemmer;
pub mod summary;
