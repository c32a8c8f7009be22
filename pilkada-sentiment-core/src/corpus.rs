use {
    std::{collections::BTreeMap, fs::File, path::Path},
    tracing::{info, warn},
    serde::Deserialize,
    crate::{
        entity::{Post, SentimentLabel},
        error::{Error, Result},
    },
};

#[derive(Deserialize, Debug)]
struct RawCorpusRow {
    #[serde(default)]
    username: String,
    #[serde(default)]
    full_text: String,
    tokoh: String,
    #[serde(rename = "Sentimen")]
    sentiment: SentimentLabel,
    #[serde(default)]
    hashtag: Option<String>,
    #[serde(default)]
    joined_swremove: Option<String>,
}

/// Labeled posts, held in memory for the whole process.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    posts: Vec<Post>,
}

impl Corpus {
    pub fn new(posts: Vec<Post>) -> Self {
        Self {
            posts,
        }
    }

    /// Loads the labeled corpus, replacing short candidate names with the full ones.
    pub fn load(path: &Path, entity_names: &BTreeMap<String, String>) -> Result<Self> {
        if !path.exists() {
            return Err(Error::missing(format!("corpus not found at {}", path.display())));
        }

        let mut reader = csv::Reader::from_reader(File::open(path)?);
        let headers = reader.headers()?.clone();

        let mut posts = Vec::new();
        let mut unmapped = 0;

        for record in reader.records() {
            let row: RawCorpusRow = record?.deserialize(Some(&headers))?;

            let entity = match entity_names.get(&row.tokoh) {
                Some(full_name) => full_name.clone(),
                None => {
                    unmapped += 1;
                    row.tokoh
                },
            };

            posts.push(Post::builder()
                .username(row.username)
                .text(row.full_text)
                .entity(entity)
                .sentiment(row.sentiment)
                .hashtag_field(row.hashtag.unwrap_or_default())
                .normalized_tokens(row.joined_swremove.unwrap_or_default())
                .build());
        }

        if unmapped > 0 {
            warn!("{} rows have an entity without a configured full name", unmapped);
        }
        info!("loaded {} posts from {}", posts.len(), path.display());

        Ok(Self::new(posts))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Post> {
        self.posts.iter()
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn for_entity<'a>(&'a self, entity: &'a str) -> impl Iterator<Item = &'a Post> + 'a {
        self.posts.iter().filter(move |post| post.entity() == entity)
    }

    /// Distinct sentiment labels present, in canonical order.
    pub fn sentiment_labels(&self) -> Vec<SentimentLabel> {
        SentimentLabel::ALL.into_iter()
            .filter(|label| self.posts.iter().any(|post| post.sentiment() == *label))
            .collect()
    }
}
