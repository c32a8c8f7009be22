use {
    std::{fmt, str::FromStr},
    typed_builder::TypedBuilder,
    serde::{Serialize, Deserialize},
    crate::error::Error,
};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SentimentLabel {
    Positif,
    Netral,
    Negatif,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentFilter {
    All,
    Only(SentimentLabel),
}

// a single labeled post from the corpus
#[derive(TypedBuilder, Serialize, Debug, Clone, PartialEq)]
pub struct Post {
    #[builder(setter(into))]
    username: String,
    #[builder(setter(into))]
    text: String,
    #[builder(setter(into))]
    entity: String,
    sentiment: SentimentLabel,
    #[builder(default, setter(into))]
    hashtag_field: String,
    #[builder(default, setter(into))]
    normalized_tokens: String,
}

impl SentimentLabel {
    /// Canonical group order used by every analytic table.
    pub const ALL: [SentimentLabel; 3] = [SentimentLabel::Positif, SentimentLabel::Netral, SentimentLabel::Negatif];

    /// Class ids as the trained model emits them. Must not be inferred from the data.
    pub fn from_class_id(id: u32) -> Option<Self> {
        match id {
            0 => Some(SentimentLabel::Netral),
            1 => Some(SentimentLabel::Positif),
            2 => Some(SentimentLabel::Negatif),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positif => "Positif",
            SentimentLabel::Netral => "Netral",
            SentimentLabel::Negatif => "Negatif",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SentimentLabel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SentimentLabel::ALL.into_iter()
            .find(|label| label.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidArgument(format!("unknown sentiment label: {}", s)))
    }
}

impl SentimentFilter {
    pub fn labels(&self) -> Vec<SentimentLabel> {
        match self {
            SentimentFilter::All => SentimentLabel::ALL.to_vec(),
            SentimentFilter::Only(label) => vec![*label],
        }
    }

    pub fn matches(&self, label: SentimentLabel) -> bool {
        match self {
            SentimentFilter::All => true,
            SentimentFilter::Only(only) => *only == label,
        }
    }
}

impl fmt::Display for SentimentFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SentimentFilter::All => f.write_str("All"),
            SentimentFilter::Only(label) => label.fmt(f),
        }
    }
}

impl FromStr for SentimentFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(SentimentFilter::All)
        } else {
            s.parse().map(SentimentFilter::Only)
        }
    }
}

impl From<SentimentLabel> for SentimentFilter {
    fn from(label: SentimentLabel) -> Self {
        SentimentFilter::Only(label)
    }
}

impl Post {
    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn sentiment(&self) -> SentimentLabel {
        self.sentiment
    }

    pub fn hashtags(&self) -> impl Iterator<Item = &str> {
        self.hashtag_field.split_whitespace()
    }

    /// Precomputed stemmed tokens, still carrying list artifacts like `[`, `'` and `,`.
    pub fn normalized_tokens(&self) -> &str {
        &self.normalized_tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_ids_follow_model_contract() {
        assert_eq!(SentimentLabel::from_class_id(0), Some(SentimentLabel::Netral));
        assert_eq!(SentimentLabel::from_class_id(1), Some(SentimentLabel::Positif));
        assert_eq!(SentimentLabel::from_class_id(2), Some(SentimentLabel::Negatif));
        assert_eq!(SentimentLabel::from_class_id(3), None);
    }

    #[test]
    fn parses_labels_and_filters() {
        assert_eq!("Positif".parse::<SentimentLabel>().unwrap(), SentimentLabel::Positif);
        assert_eq!("negatif".parse::<SentimentLabel>().unwrap(), SentimentLabel::Negatif);
        assert!("Bahagia".parse::<SentimentLabel>().is_err());

        assert_eq!("All".parse::<SentimentFilter>().unwrap(), SentimentFilter::All);
        assert_eq!(
            "Netral".parse::<SentimentFilter>().unwrap(),
            SentimentFilter::Only(SentimentLabel::Netral),
        );
    }

    #[test]
    fn filter_labels_keep_canonical_order() {
        assert_eq!(
            SentimentFilter::All.labels(),
            vec![SentimentLabel::Positif, SentimentLabel::Netral, SentimentLabel::Negatif],
        );
        assert!(SentimentFilter::Only(SentimentLabel::Netral).matches(SentimentLabel::Netral));
        assert!(!SentimentFilter::Only(SentimentLabel::Netral).matches(SentimentLabel::Positif));
    }

    #[test]
    fn post_splits_hashtag_field() {
        let post = Post::builder()
            .username("warga_jatim")
            .text("Ayo dukung #Khofifah")
            .entity("Khofifah Indar Parawansa")
            .sentiment(SentimentLabel::Positif)
            .hashtag_field("  Khofifah  PilkadaJatim ")
            .build();

        assert_eq!(post.hashtags().collect::<Vec<_>>(), vec!["Khofifah", "PilkadaJatim"]);
        assert_eq!(post.normalized_tokens(), "");
    }
}
