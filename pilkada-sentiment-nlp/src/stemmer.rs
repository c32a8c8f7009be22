use {
    tracing::debug,
    pilkada_sentiment_core::dictionary::RootWords,
};

const PARTICLES: &[&str] = &["lah", "kah", "tah", "pun"];
const POSSESSIVES: &[&str] = &["nya", "ku", "mu"];
const DERIVATIONAL_SUFFIXES: &[&str] = &["kan", "an", "i"];
const MAX_PREFIX_LAYERS: usize = 3;
const MIN_ROOT_LENGTH: usize = 2;

pub trait Stemmer: Send + Sync {
    fn stem(&self, word: &str) -> String;
}

impl<S: Stemmer + ?Sized> Stemmer for Box<S> {
    fn stem(&self, word: &str) -> String {
        (**self).stem(word)
    }
}

pub struct IdentityStemmer;

impl Stemmer for IdentityStemmer {
    fn stem(&self, word: &str) -> String {
        word.to_owned()
    }
}

/// Indonesian affix stripper that only accepts results found in the root word list.
///
/// Suffixes are removed in the order particle, possessive pronoun, derivational suffix.
/// Every intermediate form is looked up. If none is a root, up to three layers of
/// derivational prefixes are removed from the candidates, starting with the one that
/// lost the most suffixes. Words without a known root are returned unchanged.
pub struct AffixStemmer {
    roots: RootWords,
}

impl AffixStemmer {
    pub fn new(roots: RootWords) -> Self {
        Self {
            roots,
        }
    }

    fn strip_prefixes(&self, base: &str) -> Option<String> {
        let mut layer = vec![base.to_owned()];

        for _ in 0..MAX_PREFIX_LAYERS {
            let next: Vec<String> = layer.iter().flat_map(|word| prefix_candidates(word)).collect();
            if let Some(root) = next.iter().find(|candidate| self.roots.contains(candidate)) {
                return Some(root.clone());
            }
            if next.is_empty() {
                break;
            }
            layer = next;
        }

        None
    }
}

impl Stemmer for AffixStemmer {
    fn stem(&self, word: &str) -> String {
        if self.roots.contains(word) {
            return word.to_owned();
        }

        let chain = suffix_chain(word);
        if let Some(root) = chain.iter().skip(1).find(|candidate| self.roots.contains(candidate)) {
            return root.clone();
        }

        for base in chain.iter().rev() {
            if let Some(root) = self.strip_prefixes(base) {
                return root;
            }
        }

        debug!("no root found for {}", word);
        word.to_owned()
    }
}

fn suffix_chain(word: &str) -> Vec<String> {
    let mut chain = vec![word.to_owned()];

    for suffixes in [PARTICLES, POSSESSIVES, DERIVATIONAL_SUFFIXES] {
        let current = chain.last().map(|v| v.as_str()).unwrap_or(word);
        let stripped = suffixes.iter()
            .filter_map(|suffix| current.strip_suffix(suffix))
            .find(|rest| rest.chars().count() >= MIN_ROOT_LENGTH)
            .map(|rest| rest.to_owned());

        if let Some(stripped) = stripped {
            chain.push(stripped);
        }
    }

    chain
}

fn starts_with_vowel(word: &str) -> bool {
    word.starts_with(['a', 'e', 'i', 'o', 'u'])
}

// nasal prefixes (me-, pe-) replace the first letter of the root, so the letter is put back
fn prefix_candidates(word: &str) -> Vec<String> {
    let mut candidates = Vec::new();

    for prefix in ["meny", "peny"] {
        if let Some(rest) = word.strip_prefix(prefix) {
            if starts_with_vowel(rest) {
                candidates.push(format!("s{}", rest));
            }
        }
    }

    for prefix in ["meng", "peng"] {
        if let Some(rest) = word.strip_prefix(prefix) {
            candidates.push(rest.to_owned());
            if starts_with_vowel(rest) {
                candidates.push(format!("k{}", rest));
            }
        }
    }

    for prefix in ["mem", "pem"] {
        if let Some(rest) = word.strip_prefix(prefix) {
            if starts_with_vowel(rest) {
                candidates.push(format!("m{}", rest));
                candidates.push(format!("p{}", rest));
            } else {
                candidates.push(rest.to_owned());
            }
        }
    }

    for prefix in ["men", "pen"] {
        if let Some(rest) = word.strip_prefix(prefix) {
            if starts_with_vowel(rest) {
                candidates.push(format!("n{}", rest));
                candidates.push(format!("t{}", rest));
            } else {
                candidates.push(rest.to_owned());
            }
        }
    }

    for prefix in ["ber", "ter", "per", "di", "ke", "se", "be", "te", "pe", "me"] {
        if let Some(rest) = word.strip_prefix(prefix) {
            candidates.push(rest.to_owned());
        }
    }

    let mut seen = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if candidate.chars().count() >= MIN_ROOT_LENGTH && !seen.contains(&candidate) {
            seen.push(candidate);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stemmer() -> AffixStemmer {
        AffixStemmer::new(RootWords::from_words([
            "makan", "ajar", "tulis", "sapu", "pakai", "kirim", "adil", "main", "ambil", "lihat", "kerja", "rumah", "baca", "nanti",
        ]))
    }

    #[test]
    fn root_words_are_returned_unchanged() {
        assert_eq!(stemmer().stem("makan"), "makan");
        assert_eq!(stemmer().stem("nanti"), "nanti");
    }

    #[test]
    fn strips_suffixes() {
        let stemmer = stemmer();

        assert_eq!(stemmer.stem("makanlah"), "makan");
        assert_eq!(stemmer.stem("rumahnya"), "rumah");
        assert_eq!(stemmer.stem("bacakan"), "baca");
    }

    #[test]
    fn strips_prefixes_with_recoding() {
        let stemmer = stemmer();

        assert_eq!(stemmer.stem("dimakan"), "makan");
        assert_eq!(stemmer.stem("menulis"), "tulis");
        assert_eq!(stemmer.stem("menyapu"), "sapu");
        assert_eq!(stemmer.stem("memakai"), "pakai");
        assert_eq!(stemmer.stem("mengirim"), "kirim");
        assert_eq!(stemmer.stem("mengambil"), "ambil");
        assert_eq!(stemmer.stem("melihat"), "lihat");
        assert_eq!(stemmer.stem("bekerja"), "kerja");
    }

    #[test]
    fn strips_confixes_and_stacked_prefixes() {
        let stemmer = stemmer();

        assert_eq!(stemmer.stem("keadilan"), "adil");
        assert_eq!(stemmer.stem("pengajaran"), "ajar");
        assert_eq!(stemmer.stem("mempermainkan"), "main");
        assert_eq!(stemmer.stem("dimakannya"), "makan");
    }

    #[test]
    fn unknown_words_are_kept() {
        assert_eq!(stemmer().stem("khofifah"), "khofifah");
        assert_eq!(IdentityStemmer.stem("menulis"), "menulis");
    }
}
