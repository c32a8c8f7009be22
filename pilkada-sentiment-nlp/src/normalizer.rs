use {
    std::fmt,
    once_cell::sync::Lazy,
    regex::Regex,
    serde::Serialize,
    tracing::debug,
    pilkada_sentiment_core::dictionary::{SlangDictionary, StopwordSet},
    crate::stemmer::Stemmer,
};

static URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://\S+|www\.\S+").unwrap());
static HTML_ENTITY: Lazy<Regex> = Lazy::new(|| Regex::new(r"&[a-zA-Z0-9#]+;").unwrap());
static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static MENTION_OR_RETWEET: Lazy<Regex> = Lazy::new(|| Regex::new(r"[@#]\w+|RT\s+").unwrap());
static DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]").unwrap());
static NON_LETTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z ]").unwrap());
static LINE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\n\r]").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Non-empty, space-separated stemmed tokens. Only [`TextNormalizer`] produces it.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText(String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    Text(NormalizedText),
    /// Nothing usable is left; the post cannot be classified.
    Empty,
}

pub struct TextNormalizer<S> {
    slang: SlangDictionary,
    stopwords: StopwordSet,
    stemmer: S,
}

impl NormalizedText {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Normalized {
    pub fn text(&self) -> Option<&NormalizedText> {
        match self {
            Normalized::Text(text) => Some(text),
            Normalized::Empty => None,
        }
    }
}

impl<S: Stemmer> TextNormalizer<S> {
    pub fn new(slang: SlangDictionary, stopwords: StopwordSet, stemmer: S) -> Self {
        Self {
            slang,
            stopwords,
            stemmer,
        }
    }

    /// The order of the steps must match the one the classifier was trained with.
    pub fn normalize(&self, raw_text: &str) -> Normalized {
        let cleaned = clean(raw_text);
        let substituted = self.substitute_slang(&cleaned);

        let tokens: Vec<String> = self.remove_stopwords(substituted.split_whitespace())
            .into_iter()
            .map(|token| self.stemmer.stem(token))
            .filter(|token| token.chars().count() > 1)
            .collect();

        let joined = tokens.join(" ");
        debug!("normalized {:?} into {:?}", raw_text, joined);

        if joined.trim().is_empty() {
            Normalized::Empty
        } else {
            Normalized::Text(NormalizedText(joined))
        }
    }

    /// Whole-word slang replacement in one left-to-right pass.
    ///
    /// When keys overlap, the key spanning the most words wins at each position.
    /// Replacement text is never scanned again.
    pub fn substitute_slang(&self, text: &str) -> String {
        let words: Vec<&str> = text.split_whitespace().collect();
        let mut output: Vec<&str> = Vec::with_capacity(words.len());
        let mut position = 0;

        'words: while position < words.len() {
            let longest = self.slang.max_key_words().min(words.len() - position);
            for span in (1..=longest).rev() {
                let key = words[position..position + span].join(" ");
                if let Some(replacement) = self.slang.get(&key) {
                    output.push(replacement);
                    position += span;
                    continue 'words;
                }
            }
            output.push(words[position]);
            position += 1;
        }

        output.join(" ")
    }

    pub fn remove_stopwords<'a>(&self, tokens: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
        tokens.into_iter().filter(|token| !self.stopwords.contains(token)).collect()
    }
}

/// Cleaning and case folding, steps that do not depend on any dictionary.
pub fn clean(text: &str) -> String {
    let text = URL.replace_all(text, " ");
    let text = HTML_ENTITY.replace_all(&text, " ");
    let text = HTML_TAG.replace_all(&text, " ");
    let text = split_glued_sentences(&text);
    let text = text.replace('\u{a0}', " ");
    let text = MENTION_OR_RETWEET.replace_all(&text, " ");
    let text = DIGIT.replace_all(&text, " ");
    let text = NON_LETTER.replace_all(&text, " ");
    let text = LINE_BREAK.replace_all(&text, " ");
    let text = WHITESPACE.replace_all(&text, " ");

    text.trim().to_lowercase()
}

// "bagus.mantap" -> "bagus mantap"; every period with a word character on both sides
fn split_glued_sentences(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();

    chars.iter()
        .enumerate()
        .map(|(i, &c)| {
            let glued = c == '.'
                && i > 0
                && i + 1 < chars.len()
                && is_word_char(chars[i - 1])
                && is_word_char(chars[i + 1]);

            if glued { ' ' } else { c }
        })
        .collect()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
