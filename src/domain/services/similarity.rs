//! Bigram Cosine Similarity
//!
//! Lexical similarity between two strings, used as a confidence gate on
//! geocoder matches. Each string is turned into a frequency profile of
//! its contiguous character bigrams and the cosine of the two profiles
//! is returned.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Shingle length used by the default scorer.
pub const BIGRAM: usize = 2;

/// Sparse n-gram frequency vector.
pub type Profile = HashMap<String, u32>;

/// Cosine similarity over character n-gram profiles.
///
/// Stateless and cheap to share; construct once and pass around by
/// reference or `Arc`.
#[derive(Debug, Clone, Copy)]
pub struct BigramCosine {
    k: usize,
}

impl Default for BigramCosine {
    fn default() -> Self {
        Self { k: BIGRAM }
    }
}

impl BigramCosine {
    /// Scorer over shingles of length `k` (clamped to at least 1).
    pub fn with_shingle_len(k: usize) -> Self {
        Self { k: k.max(1) }
    }

    /// Build the n-gram frequency profile of a string.
    ///
    /// Whitespace runs are folded to one space first so that bigrams
    /// spanning adjacent words are counted the same way regardless of
    /// spacing. Strings shorter than `k` characters have an empty profile.
    pub fn profile(&self, s: &str) -> Profile {
        let folded = WHITESPACE_RUN.replace_all(s, " ");
        let chars: Vec<char> = folded.chars().collect();
        let mut profile = Profile::new();
        if chars.len() < self.k {
            return profile;
        }
        for window in chars.windows(self.k) {
            let shingle: String = window.iter().collect();
            *profile.entry(shingle).or_insert(0) += 1;
        }
        profile
    }

    /// Cosine of two precomputed profiles.
    ///
    /// An empty profile on either side yields 0.0.
    pub fn similarity_profiles(&self, a: &Profile, b: &Profile) -> f64 {
        if a.is_empty() || b.is_empty() {
            return 0.0;
        }
        // iterate the smaller map for the dot product
        let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
        let dot: f64 = small
            .iter()
            .filter_map(|(gram, &n)| large.get(gram).map(|&m| n as f64 * m as f64))
            .sum();
        dot / (squared_norm(a) * squared_norm(b)).sqrt()
    }

    /// Similarity of two strings in `[0.0, 1.0]`.
    ///
    /// Identical strings always score 1.0, including strings too short to
    /// have any bigram. Otherwise a string with an empty profile scores 0.0.
    pub fn similarity(&self, a: &str, b: &str) -> f64 {
        if a == b {
            return 1.0;
        }
        let pa = self.profile(a);
        let pb = self.profile(b);
        self.similarity_profiles(&pa, &pb).min(1.0)
    }
}

fn squared_norm(profile: &Profile) -> f64 {
    profile.values().map(|&n| (n as f64) * (n as f64)).sum()
}
