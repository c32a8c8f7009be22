use {
    std::{collections::HashMap, fs::File, io::BufReader, path::PathBuf},
    once_cell::sync::Lazy,
    regex::Regex,
    serde::{Deserialize, de::DeserializeOwned},
    tracing::info,
    pilkada_sentiment_core::{
        config::ModelConfig,
        error::{Error, Result},
    },
};

// same token pattern the vectorizer was fitted with
static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w\w+\b").unwrap());

pub trait FeatureEncoder: Send + Sync {
    fn transform(&self, text: &str) -> Result<Vec<f64>>;
}

pub trait FeatureSelector: Send + Sync {
    fn transform(&self, features: &[f64]) -> Result<Vec<f64>>;
}

pub trait Classifier: Send + Sync {
    /// Class ids in the order `predict_probabilities` reports them.
    fn classes(&self) -> &[u32];

    fn predict(&self, features: &[f64]) -> Result<u32>;

    /// `None` when the model has no probability interface.
    fn predict_probabilities(&self, features: &[f64]) -> Result<Option<Vec<f64>>>;
}

impl<T: FeatureEncoder + ?Sized> FeatureEncoder for Box<T> {
    fn transform(&self, text: &str) -> Result<Vec<f64>> {
        (**self).transform(text)
    }
}

impl<T: FeatureSelector + ?Sized> FeatureSelector for Box<T> {
    fn transform(&self, features: &[f64]) -> Result<Vec<f64>> {
        (**self).transform(features)
    }
}

impl<T: Classifier + ?Sized> Classifier for Box<T> {
    fn classes(&self) -> &[u32] {
        (**self).classes()
    }

    fn predict(&self, features: &[f64]) -> Result<u32> {
        (**self).predict(features)
    }

    fn predict_probabilities(&self, features: &[f64]) -> Result<Option<Vec<f64>>> {
        (**self).predict_probabilities(features)
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L2,
}

/// Fitted tf-idf vectorizer. Only deserialized encoders that pass `validate` exist.
#[derive(Deserialize, Debug, Clone)]
#[serde(try_from = "RawTfidfEncoder")]
pub struct TfidfEncoder {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    ngram_range: (usize, usize),
    sublinear_tf: bool,
    norm: Option<Norm>,
}

#[derive(Deserialize)]
struct RawTfidfEncoder {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    #[serde(default = "default_ngram_range")]
    ngram_range: (usize, usize),
    #[serde(default)]
    sublinear_tf: bool,
    #[serde(default = "default_norm")]
    norm: Option<Norm>,
}

/// Keeps the feature columns chosen by a fitted selector, in order.
#[derive(Deserialize, Debug, Clone)]
pub struct FeatureMask {
    support: Vec<usize>,
}

/// Fitted linear model with one weight row per class.
#[derive(Deserialize, Debug, Clone)]
pub struct LinearClassifier {
    classes: Vec<u32>,
    coef: Vec<Vec<f64>>,
    intercept: Vec<f64>,
    #[serde(default = "default_probability")]
    probability: bool,
}

pub struct ModelArtifacts {
    pub encoder: TfidfEncoder,
    pub selector: FeatureMask,
    pub classifier: LinearClassifier,
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

fn default_probability() -> bool {
    true
}

impl TryFrom<RawTfidfEncoder> for TfidfEncoder {
    type Error = Error;

    fn try_from(raw: RawTfidfEncoder) -> Result<Self> {
        let encoder = Self {
            vocabulary: raw.vocabulary,
            idf: raw.idf,
            ngram_range: raw.ngram_range,
            sublinear_tf: raw.sublinear_tf,
            norm: raw.norm,
        };
        encoder.validate()?;
        Ok(encoder)
    }
}

impl TfidfEncoder {
    pub fn validate(&self) -> Result<()> {
        let (min_n, max_n) = self.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(Error::model(format!("invalid ngram range ({}, {})", min_n, max_n)));
        }

        if let Some((term, index)) = self.vocabulary.iter().find(|(_, index)| **index >= self.idf.len()) {
            return Err(Error::model(format!("term {:?} points at column {} but there are only {} idf weights", term, index, self.idf.len())));
        }

        Ok(())
    }

    pub fn dimension(&self) -> usize {
        self.idf.len()
    }
}

impl FeatureEncoder for TfidfEncoder {
    fn transform(&self, text: &str) -> Result<Vec<f64>> {
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = TOKEN.find_iter(&lowered).map(|m| m.as_str()).collect();

        let mut counts: HashMap<usize, f64> = HashMap::new();
        let (min_n, max_n) = self.ngram_range;
        for n in min_n..=max_n {
            for window in tokens.windows(n) {
                if let Some(index) = self.vocabulary.get(&window.join(" ")) {
                    *counts.entry(*index).or_insert(0.0) += 1.0;
                }
            }
        }

        let mut features = vec![0.0; self.idf.len()];
        for (index, count) in counts {
            let tf = if self.sublinear_tf { 1.0 + count.ln() } else { count };
            let weight = self.idf.get(index).ok_or_else(|| Error::model(format!("no idf weight for column {}", index)))?;
            features[index] = tf * weight;
        }

        if self.norm == Some(Norm::L2) {
            let length = features.iter().map(|v| v * v).sum::<f64>().sqrt();
            if length > 0.0 {
                features.iter_mut().for_each(|v| *v /= length);
            }
        }

        Ok(features)
    }
}

impl FeatureMask {
    pub fn new(support: Vec<usize>) -> Self {
        Self {
            support,
        }
    }
}

impl FeatureSelector for FeatureMask {
    fn transform(&self, features: &[f64]) -> Result<Vec<f64>> {
        self.support.iter()
            .map(|index| features.get(*index).copied().ok_or_else(|| {
                Error::model(format!("selected column {} is outside a vector of width {}", index, features.len()))
            }))
            .collect()
    }
}

impl LinearClassifier {
    pub fn new(classes: Vec<u32>, coef: Vec<Vec<f64>>, intercept: Vec<f64>, probability: bool) -> Self {
        Self {
            classes,
            coef,
            intercept,
            probability,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.classes.is_empty() {
            return Err(Error::model("classifier has no classes"));
        }
        if self.coef.len() != self.classes.len() || self.intercept.len() != self.classes.len() {
            return Err(Error::model(format!(
                "expected {} weight rows and intercepts, got {} and {}",
                self.classes.len(),
                self.coef.len(),
                self.intercept.len(),
            )));
        }

        let width = self.coef[0].len();
        if self.coef.iter().any(|row| row.len() != width) {
            return Err(Error::model("weight rows have different widths"));
        }

        Ok(())
    }

    fn decision_scores(&self, features: &[f64]) -> Result<Vec<f64>> {
        self.coef.iter()
            .zip(&self.intercept)
            .map(|(row, intercept)| {
                if row.len() != features.len() {
                    return Err(Error::model(format!("classifier expects {} features, got {}", row.len(), features.len())));
                }
                Ok(row.iter().zip(features).map(|(w, x)| w * x).sum::<f64>() + intercept)
            })
            .collect()
    }
}

impl Classifier for LinearClassifier {
    fn classes(&self) -> &[u32] {
        &self.classes
    }

    fn predict(&self, features: &[f64]) -> Result<u32> {
        let scores = self.decision_scores(features)?;

        let mut best = 0;
        for (index, score) in scores.iter().enumerate() {
            if *score > scores[best] {
                best = index;
            }
        }

        self.classes.get(best).copied().ok_or_else(|| Error::model("classifier has no classes"))
    }

    fn predict_probabilities(&self, features: &[f64]) -> Result<Option<Vec<f64>>> {
        if !self.probability {
            return Ok(None);
        }

        let scores = self.decision_scores(features)?;
        let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let exp: Vec<f64> = scores.iter().map(|score| (score - max).exp()).collect();
        let total: f64 = exp.iter().sum();

        Ok(Some(exp.into_iter().map(|v| v / total).collect()))
    }
}

impl ModelArtifacts {
    pub fn load(config: &ModelConfig) -> Result<Self> {
        let encoder: TfidfEncoder = read_artifact(config.vectorizer(), "vectorizer")?;
        let selector: FeatureMask = read_artifact(config.selector(), "feature selector")?;
        let classifier: LinearClassifier = read_artifact(config.classifier(), "classifier")?;
        classifier.validate()?;
        check_compatible(&encoder, &selector, &classifier)?;

        info!(
            "loaded model artifacts: {} terms, {} selected features, {} classes",
            encoder.dimension(),
            selector.support.len(),
            classifier.classes.len(),
        );

        Ok(Self {
            encoder,
            selector,
            classifier,
        })
    }
}

// the selector reads encoder columns and the classifier reads selector output
fn check_compatible(encoder: &TfidfEncoder, selector: &FeatureMask, classifier: &LinearClassifier) -> Result<()> {
    if let Some(index) = selector.support.iter().find(|index| **index >= encoder.dimension()) {
        return Err(Error::model(format!(
            "feature selector keeps column {} but the vectorizer has {} columns",
            index,
            encoder.dimension(),
        )));
    }

    if let Some(row) = classifier.coef.iter().find(|row| row.len() != selector.support.len()) {
        return Err(Error::model(format!(
            "classifier expects {} features but the feature selector keeps {}",
            row.len(),
            selector.support.len(),
        )));
    }

    Ok(())
}

fn read_artifact<T: DeserializeOwned>(path: Option<&PathBuf>, name: &str) -> Result<T> {
    let path = path.ok_or_else(|| Error::missing(format!("{} path is not configured", name)))?;
    if !path.exists() {
        return Err(Error::missing(format!("{} not found at {}", name, path.display())));
    }

    Ok(serde_json::from_reader(BufReader::new(File::open(path)?))?)
}

#[cfg(test)]
mod tests {
    use {
        std::io::Write,
        approx::assert_relative_eq,
        super::*,
    };

    fn encoder(json: &str) -> TfidfEncoder {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn tfidf_weights_and_normalizes() {
        let encoder = encoder(r#"{"vocabulary": {"bagus": 0, "sekali": 1, "buruk": 2}, "idf": [1.0, 2.0, 3.0]}"#);

        let features = encoder.transform("bagus bagus sekali lainnya").unwrap();

        // raw weights [2, 2, 0] before l2 normalization
        assert_relative_eq!(features[0], 2.0 / 8f64.sqrt());
        assert_relative_eq!(features[1], 2.0 / 8f64.sqrt());
        assert_relative_eq!(features[2], 0.0);
    }

    #[test]
    fn tfidf_supports_bigrams_and_sublinear_tf() {
        let encoder = encoder(r#"{
            "vocabulary": {"bagus": 0, "bagus sekali": 1},
            "idf": [1.0, 1.0],
            "ngram_range": [1, 2],
            "sublinear_tf": true,
            "norm": null
        }"#);

        let features = encoder.transform("Bagus sekali bagus").unwrap();

        assert_relative_eq!(features[0], 1.0 + 2f64.ln());
        assert_relative_eq!(features[1], 1.0);
    }

    #[test]
    fn tfidf_rejects_invalid_artifacts_when_deserialized() {
        let outside_idf = serde_json::from_str::<TfidfEncoder>(r#"{"vocabulary": {"bagus": 3}, "idf": [1.0]}"#);
        assert!(outside_idf.unwrap_err().to_string().contains("column 3"));

        let zero_width = serde_json::from_str::<TfidfEncoder>(r#"{"vocabulary": {"bagus": 0}, "idf": [1.0], "ngram_range": [0, 1]}"#);
        assert!(zero_width.unwrap_err().to_string().contains("invalid ngram range"));

        let reversed = serde_json::from_str::<TfidfEncoder>(r#"{"vocabulary": {"bagus": 0}, "idf": [1.0], "ngram_range": [2, 1]}"#);
        assert!(reversed.is_err());
    }

    #[test]
    fn mask_keeps_selected_columns() {
        let mask = FeatureMask::new(vec![2, 0]);

        assert_eq!(mask.transform(&[0.1, 0.2, 0.3]).unwrap(), vec![0.3, 0.1]);
        assert!(matches!(mask.transform(&[0.1]), Err(Error::Model(_))));
    }

    #[test]
    fn linear_classifier_predicts_argmax_with_softmax() {
        let classifier = LinearClassifier::new(
            vec![0, 1, 2],
            vec![vec![0.0, 0.0], vec![2.0, 0.0], vec![0.0, 1.0]],
            vec![0.0, 0.0, 0.0],
            true,
        );
        classifier.validate().unwrap();

        assert_eq!(classifier.predict(&[1.0, 0.0]).unwrap(), 1);

        let probabilities = classifier.predict_probabilities(&[1.0, 0.0]).unwrap().unwrap();
        assert_relative_eq!(probabilities.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        assert!(probabilities[1] > probabilities[0] && probabilities[1] > probabilities[2]);

        assert!(matches!(classifier.predict(&[1.0]), Err(Error::Model(_))));
    }

    #[test]
    fn classifier_without_probabilities_reports_none() {
        let classifier = LinearClassifier::new(vec![0, 1], vec![vec![1.0], vec![-1.0]], vec![0.0, 0.0], false);

        assert_eq!(classifier.predict(&[1.0]).unwrap(), 0);
        assert_eq!(classifier.predict_probabilities(&[1.0]).unwrap(), None);
    }

    #[test]
    fn loads_artifacts_and_reports_missing_ones() {
        let dir = tempfile::tempdir().unwrap();
        let write = |name: &str, body: &str| {
            let path = dir.path().join(name);
            File::create(&path).unwrap().write_all(body.as_bytes()).unwrap();
            path
        };

        let config = ModelConfig::new(
            write("vectorizer.json", r#"{"vocabulary": {"bagus": 0}, "idf": [1.0]}"#),
            write("selector.json", r#"{"support": [0]}"#),
            write("classifier.json", r#"{"classes": [0, 1], "coef": [[0.0], [1.0]], "intercept": [0.0, 0.0]}"#),
        );

        let artifacts = ModelArtifacts::load(&config).unwrap();
        assert_eq!(artifacts.classifier.classes(), &[0, 1]);

        let config = ModelConfig::new(
            dir.path().join("vectorizer.json"),
            dir.path().join("missing.json"),
            dir.path().join("classifier.json"),
        );
        assert!(matches!(ModelArtifacts::load(&config), Err(Error::MissingConfiguration(_))));
    }

    #[test]
    fn rejects_artifacts_that_do_not_fit_together() {
        let dir = tempfile::tempdir().unwrap();
        let write = |name: &str, body: &str| {
            let path = dir.path().join(name);
            File::create(&path).unwrap().write_all(body.as_bytes()).unwrap();
            path
        };

        let vectorizer = write("vectorizer.json", r#"{"vocabulary": {"bagus": 0}, "idf": [1.0]}"#);
        let classifier = write("classifier.json", r#"{"classes": [0, 1], "coef": [[0.0], [1.0]], "intercept": [0.0, 0.0]}"#);

        let config = ModelConfig::new(vectorizer.clone(), write("wide_selector.json", r#"{"support": [5]}"#), classifier);
        assert!(matches!(ModelArtifacts::load(&config), Err(Error::Model(_))));

        let config = ModelConfig::new(
            vectorizer,
            write("selector.json", r#"{"support": [0]}"#),
            write("wide_classifier.json", r#"{"classes": [0, 1], "coef": [[0.0, 1.0], [1.0, 0.0]], "intercept": [0.0, 0.0]}"#),
        );
        assert!(matches!(ModelArtifacts::load(&config), Err(Error::Model(_))));
    }
}
