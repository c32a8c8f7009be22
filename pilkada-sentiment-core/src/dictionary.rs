use {
    std::{collections::{HashMap, HashSet}, fs, path::Path},
    tracing::{info, debug, warn},
    crate::error::{Error, Result},
};

const GENERAL_STOPWORDS: &str = include_str!("../data/stopwords_id.txt");
const STEMMER_LIBRARY_STOPWORDS: &str = include_str!("../data/stopwords_sastrawi.txt");
const CUSTOM_STOPWORDS: &[&str] = &["loh", "lah", "dong"];

/// Domain abbreviations and candidate nicknames layered over the slang table.
pub const MANUAL_SLANG_OVERRIDES: &[(&str, &str)] = &[
    ("p", "perjuangan"),
    ("iniiii", "ini"),
    ("bauuuuu", "bau"),
    ("anake", "anak"),
    ("ibuibu", "ibu ibu"),
    ("nu", "nahdlatul ulama"),
    ("pragib", "prabowo gibran"),
    ("dahal", "padahal"),
    ("lagiiiii", "lagi"),
    ("kopipa", "khofifah"),
    ("kopipah", "khofifah"),
    ("khopipah", "khofifah"),
    ("hopipah", "khofifah"),
];

/// Informal spelling -> canonical word(s).
#[derive(Debug, Clone, Default)]
pub struct SlangDictionary {
    entries: HashMap<String, String>,
    max_key_words: usize,
}

#[derive(Debug, Clone, Default)]
pub struct StopwordSet {
    words: HashSet<String>,
}

/// Root words for dictionary-backed stemming.
#[derive(Debug, Clone, Default)]
pub struct RootWords {
    words: HashSet<String>,
}

impl SlangDictionary {
    pub fn from_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self where K: Into<String>, V: Into<String> {
        let mut dictionary = Self::default();
        for (key, value) in entries {
            dictionary.insert(key.into(), value.into());
        }
        dictionary
    }

    /// Reads the two-column, headerless, ISO-8859-1 encoded normalization table.
    pub fn load_csv(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::missing(format!("normalization dictionary not found at {}", path.display())));
        }

        let bytes = fs::read(path)?;
        let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(decoded.as_bytes());

        let mut dictionary = Self::default();
        let mut skipped = 0;
        for record in reader.records() {
            let record = record?;
            match (record.get(0), record.get(1)) {
                (Some(key), Some(value)) if !key.is_empty() && !value.is_empty() => {
                    dictionary.insert(key.to_owned(), value.to_owned());
                },
                _ => skipped += 1,
            }
        }

        if skipped > 0 {
            warn!("skipped {} incomplete rows in {}", skipped, path.display());
        }
        info!("loaded {} slang entries from {}", dictionary.len(), path.display());

        Ok(dictionary)
    }

    pub fn with_manual_overrides(self) -> Self {
        self.with_overrides(MANUAL_SLANG_OVERRIDES.iter().map(|(key, value)| (*key, *value)))
    }

    pub fn with_overrides<K, V>(mut self, overrides: impl IntoIterator<Item = (K, V)>) -> Self where K: Into<String>, V: Into<String> {
        for (key, value) in overrides {
            self.insert(key.into(), value.into());
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|v| v.as_str())
    }

    /// Number of words in the longest key.
    pub fn max_key_words(&self) -> usize {
        self.max_key_words
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, key: String, value: String) {
        // cleaned text only ever holds lowercase latin letters separated by single spaces
        if !is_matchable_key(&key) {
            debug!("dropping slang key that cannot match cleaned text: {:?}", key);
            return;
        }

        self.max_key_words = self.max_key_words.max(key.split(' ').count());
        self.entries.insert(key, value);
    }
}

fn is_matchable_key(key: &str) -> bool {
    !key.is_empty() && key.split(' ').all(|word| !word.is_empty() && word.bytes().all(|b| b.is_ascii_lowercase()))
}

impl StopwordSet {
    pub fn from_words<S: Into<String>>(words: impl IntoIterator<Item = S>) -> Self {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    /// General Indonesian list, the stemmer library's list, custom additions and `extra`.
    pub fn indonesian(extra: &[String]) -> Self {
        let words = GENERAL_STOPWORDS.split_whitespace()
            .chain(STEMMER_LIBRARY_STOPWORDS.split_whitespace())
            .chain(CUSTOM_STOPWORDS.iter().copied())
            .chain(extra.iter().map(|v| v.as_str()))
            .map(|v| v.to_owned());

        Self::from_words(words)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl RootWords {
    pub fn from_words<S: Into<String>>(words: impl IntoIterator<Item = S>) -> Self {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    /// One word per line; blank lines are ignored.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::missing(format!("root word list not found at {}", path.display())));
        }

        let words = Self::from_words(
            fs::read_to_string(path)?
                .lines()
                .map(|line| line.trim().to_lowercase())
                .filter(|line| !line.is_empty())
        );
        info!("loaded {} root words from {}", words.len(), path.display());

        Ok(words)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use {
        std::io::Write,
        super::*,
    };

    #[test]
    fn loads_latin1_csv_and_applies_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"gk,tidak\nyg,yang\ncaf\xe9,kafe\nsdh\nkopipah,kopi\n").unwrap();

        let dictionary = SlangDictionary::load_csv(file.path()).unwrap().with_manual_overrides();

        assert_eq!(dictionary.get("gk"), Some("tidak"));
        assert_eq!(dictionary.get("yg"), Some("yang"));
        // non-ascii key can never match cleaned text
        assert_eq!(dictionary.get("café"), None);
        assert_eq!(dictionary.get("sdh"), None);
        assert_eq!(dictionary.get("kopipah"), Some("khofifah"));
        assert_eq!(dictionary.get("pragib"), Some("prabowo gibran"));
    }

    #[test]
    fn missing_dictionary_is_a_configuration_error() {
        let err = SlangDictionary::load_csv(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, Error::MissingConfiguration(_)));
    }

    #[test]
    fn tracks_longest_key() {
        let dictionary = SlangDictionary::from_entries([("gk", "tidak"), ("ga jelas", "tidak jelas"), ("Gk", "x")]);

        assert_eq!(dictionary.max_key_words(), 2);
        assert_eq!(dictionary.len(), 2);
    }

    #[test]
    fn combined_stopwords_include_every_source() {
        let stopwords = StopwordSet::indonesian(&["sih".to_owned()]);

        assert!(stopwords.contains("yang"));
        assert!(stopwords.contains("nggak"));
        assert!(stopwords.contains("loh"));
        assert!(stopwords.contains("sih"));
        assert!(!stopwords.contains("bagus"));
    }

    #[test]
    fn loads_root_words() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "makan\n\n Ajar \n").unwrap();

        let roots = RootWords::load(file.path()).unwrap();

        assert_eq!(roots.len(), 2);
        assert!(roots.contains("ajar"));
    }
}
