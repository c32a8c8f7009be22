use {
    std::{fs::read_to_string, path::{Path, PathBuf}, collections::BTreeMap},
    serde::Deserialize,
    crate::{
        entity::SentimentFilter,
        error::{Error, Result},
    },
};

const CONFIG_LOCATIONS: &[&str] = &["./config.toml", "/config/config.toml"];

pub const MIN_TOP_NUMBER: usize = 5;
pub const MAX_TOP_NUMBER: usize = 50;

#[derive(Deserialize, Debug)]
pub struct Config {
    #[serde(default)]
    pub resources: ResourcesConfig,
    pub model: Option<ModelConfig>,
    pub dashboard: Option<DashboardConfig>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ResourcesConfig {
    corpus: Option<PathBuf>,
    normalization_dictionary: Option<PathBuf>,
    root_words: Option<PathBuf>,
    #[serde(default)]
    extra_stopwords: Vec<String>,
    #[serde(default)]
    slang_overrides: BTreeMap<String, String>,
    entity_names: Option<BTreeMap<String, String>>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ModelConfig {
    vectorizer: Option<PathBuf>,
    selector: Option<PathBuf>,
    classifier: Option<PathBuf>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct DashboardConfig {
    entity: Option<String>,
    sentiment: Option<String>,
    top_number: Option<usize>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct LoggingConfig {
    level: Option<String>,
    #[serde(default)]
    json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            resources: ResourcesConfig::default(),
            model: None,
            dashboard: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ResourcesConfig {
    fn default() -> Self {
        Self {
            corpus: None,
            normalization_dictionary: None,
            root_words: None,
            extra_stopwords: Vec::new(),
            slang_overrides: BTreeMap::new(),
            entity_names: None,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            vectorizer: Some(PathBuf::from("Model/tfidf_vectorizer.json")),
            selector: Some(PathBuf::from("Model/feature_selector.json")),
            classifier: Some(PathBuf::from("Model/classifier.json")),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            entity: None,
            sentiment: None,
            top_number: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: None,
            json: false,
        }
    }
}

impl Config {
    /// Reads ./config.toml, then /config/config.toml. On failure returns the defaults
    /// together with the reason, so it can be logged once logging is up.
    pub fn load() -> (Self, Option<Error>) {
        match Self::load_first(CONFIG_LOCATIONS) {
            Ok(config) => (config, None),
            Err(err) => (Config::default(), Some(err)),
        }
    }

    fn load_first<P: AsRef<Path>>(locations: &[P]) -> Result<Self> {
        let mut last_err = None;
        for location in locations {
            match read_to_string(location) {
                Ok(content) => return Ok(toml::from_str(&content)?),
                Err(err) => last_err = Some(err),
            }
        }

        Err(last_err.map(Error::from).unwrap_or_else(|| Error::missing("no config location")))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        Ok(toml::from_str(&read_to_string(path)?)?)
    }

    pub fn model(&self) -> ModelConfig {
        self.model.as_ref().cloned().unwrap_or_default()
    }

    pub fn dashboard(&self) -> DashboardConfig {
        self.dashboard.as_ref().cloned().unwrap_or_default()
    }
}

impl ResourcesConfig {
    pub fn corpus(&self) -> PathBuf {
        self.corpus.as_ref().cloned().unwrap_or_else(|| PathBuf::from("Data/data_cagub_analisis.csv"))
    }

    pub fn normalization_dictionary(&self) -> PathBuf {
        self.normalization_dictionary.as_ref().cloned().unwrap_or_else(|| PathBuf::from("Data/Kamus Normalisasi.csv"))
    }

    pub fn root_words(&self) -> PathBuf {
        self.root_words.as_ref().cloned().unwrap_or_else(|| PathBuf::from("Data/kata-dasar.txt"))
    }

    pub fn extra_stopwords(&self) -> &[String] {
        &self.extra_stopwords
    }

    pub fn slang_overrides(&self) -> &BTreeMap<String, String> {
        &self.slang_overrides
    }

    /// Short candidate names used in the corpus mapped to their full names.
    pub fn entity_names(&self) -> BTreeMap<String, String> {
        self.entity_names.as_ref().cloned().unwrap_or_else(default_entity_names)
    }
}

impl ModelConfig {
    pub fn new(vectorizer: PathBuf, selector: PathBuf, classifier: PathBuf) -> Self {
        Self {
            vectorizer: Some(vectorizer),
            selector: Some(selector),
            classifier: Some(classifier),
        }
    }

    pub fn vectorizer(&self) -> Option<&PathBuf> {
        self.vectorizer.as_ref()
    }

    pub fn selector(&self) -> Option<&PathBuf> {
        self.selector.as_ref()
    }

    pub fn classifier(&self) -> Option<&PathBuf> {
        self.classifier.as_ref()
    }
}

impl DashboardConfig {
    pub fn entity(&self) -> String {
        self.entity.as_ref().cloned().unwrap_or("Luluk Nur Hamidah".to_owned())
    }

    pub fn sentiment_filter(&self) -> Result<SentimentFilter> {
        self.sentiment.as_deref().unwrap_or("All").parse()
    }

    pub fn top_number(&self) -> usize {
        self.top_number.unwrap_or(20).clamp(MIN_TOP_NUMBER, MAX_TOP_NUMBER)
    }
}

impl LoggingConfig {
    pub fn level(&self) -> &str {
        self.level.as_deref().unwrap_or("info")
    }

    pub fn json(&self) -> bool {
        self.json
    }
}

fn default_entity_names() -> BTreeMap<String, String> {
    [
        ("Luluk", "Luluk Nur Hamidah"),
        ("Khofifah", "Khofifah Indar Parawansa"),
        ("Risma", "Tri Rismaharini"),
    ]
        .into_iter()
        .map(|(short, full)| (short.to_owned(), full.to_owned()))
        .collect()
}
