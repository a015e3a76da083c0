//! TF-IDF vectorizer and the immutable vector index.
//!
//! The index is built once from the `content` field of every article:
//!
//! 1. Tokenize: lowercase, keep runs of two or more word characters, drop
//!    English stopwords.
//! 2. Vocabulary: keep the `max_features` most frequent terms across the
//!    corpus (ties by term ascending), then number columns in term order.
//! 3. Weight: raw term count × smooth IDF `ln((1 + n) / (1 + df)) + 1`.
//! 4. L2-normalize each row so cosine similarity is a plain dot product.
//!
//! Row `i` always belongs to article `i`.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::corpus::Corpus;

static TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w\w+\b").unwrap());

/// The standard English stopword list used by common TF-IDF vectorizers.
static ENGLISH_STOPWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "a", "about", "above", "across", "after", "afterwards", "again", "against", "all",
        "almost", "alone", "along", "already", "also", "although", "always", "am", "among",
        "amongst", "amoungst", "amount", "an", "and", "another", "any", "anyhow", "anyone",
        "anything", "anyway", "anywhere", "are", "around", "as", "at", "back", "be", "became",
        "because", "become", "becomes", "becoming", "been", "before", "beforehand", "behind",
        "being", "below", "beside", "besides", "between", "beyond", "bill", "both", "bottom",
        "but", "by", "call", "can", "cannot", "cant", "co", "con", "could", "couldnt", "cry",
        "de", "describe", "detail", "do", "done", "down", "due", "during", "each", "eg",
        "eight", "either", "eleven", "else", "elsewhere", "empty", "enough", "etc", "even",
        "ever", "every", "everyone", "everything", "everywhere", "except", "few", "fifteen",
        "fifty", "fill", "find", "fire", "first", "five", "for", "former", "formerly", "forty",
        "found", "four", "from", "front", "full", "further", "get", "give", "go", "had", "has",
        "hasnt", "have", "he", "hence", "her", "here", "hereafter", "hereby", "herein",
        "hereupon", "hers", "herself", "him", "himself", "his", "how", "however", "hundred",
        "i", "ie", "if", "in", "inc", "indeed", "interest", "into", "is", "it", "its", "itself",
        "keep", "last", "latter", "latterly", "least", "less", "ltd", "made", "many", "may",
        "me", "meanwhile", "might", "mill", "mine", "more", "moreover", "most", "mostly",
        "move", "much", "must", "my", "myself", "name", "namely", "neither", "never",
        "nevertheless", "next", "nine", "no", "nobody", "none", "noone", "nor", "not",
        "nothing", "now", "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto",
        "or", "other", "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own",
        "part", "per", "perhaps", "please", "put", "rather", "re", "same", "see", "seem",
        "seemed", "seeming", "seems", "serious", "several", "she", "should", "show", "side",
        "since", "sincere", "six", "sixty", "so", "some", "somehow", "someone", "something",
        "sometime", "sometimes", "somewhere", "still", "such", "system", "take", "ten", "than",
        "that", "the", "their", "them", "themselves", "then", "thence", "there", "thereafter",
        "thereby", "therefore", "therein", "thereupon", "these", "they", "thick", "thin",
        "third", "this", "those", "though", "three", "through", "throughout", "thru", "thus",
        "to", "together", "too", "top", "toward", "towards", "twelve", "twenty", "two", "un",
        "under", "until", "up", "upon", "us", "very", "via", "was", "we", "well", "were",
        "what", "whatever", "when", "whence", "whenever", "where", "whereafter", "whereas",
        "whereby", "wherein", "whereupon", "wherever", "whether", "which", "while", "whither",
        "who", "whoever", "whole", "whom", "whose", "why", "will", "with", "within", "without",
        "would", "yet", "you", "your", "yours", "yourself", "yourselves",
    ]
    .into_iter()
    .collect()
});

/// Vectorizer settings.
#[derive(Debug, Clone, Copy)]
pub struct IndexOptions {
    /// Upper bound on vocabulary size.
    pub max_features: usize,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self { max_features: 2000 }
    }
}

/// Sparse weight vector: `(column, weight)` pairs sorted by column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    fn from_counts(counts: BTreeMap<usize, usize>, idf: &[f64]) -> SparseVector {
        let mut entries: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(col, n)| (col, n as f64 * idf[col]))
            .collect();
        let norm = entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in &mut entries {
                *w /= norm;
            }
        }
        SparseVector { entries }
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    /// True when no vocabulary term contributed any weight.
    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dot product of two column-sorted vectors.
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j, mut sum) = (0, 0, 0.0);
        while i < self.entries.len() && j < other.entries.len() {
            let (ca, wa) = self.entries[i];
            let (cb, wb) = other.entries[j];
            match ca.cmp(&cb) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += wa * wb;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

/// Lowercased, stopword-filtered tokens of `text`, in order.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|t| !ENGLISH_STOPWORDS.contains(*t))
        .map(str::to_string)
        .collect()
}

/// Immutable TF-IDF document-term matrix over a corpus.
#[derive(Debug, Clone)]
pub struct VectorIndex {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    rows: Vec<SparseVector>,
}

impl VectorIndex {
    /// Build the index over every article's `content`.
    ///
    /// A corpus with no usable terms yields an index with zero columns whose
    /// rows are all zero vectors.
    pub fn build(corpus: &Corpus, opts: IndexOptions) -> VectorIndex {
        let docs: Vec<Vec<String>> = corpus.iter().map(|a| tokenize(&a.content)).collect();
        let n_docs = docs.len();

        let mut total: HashMap<&str, usize> = HashMap::new();
        let mut df: HashMap<&str, usize> = HashMap::new();
        for tokens in &docs {
            let mut seen: HashSet<&str> = HashSet::new();
            for t in tokens {
                *total.entry(t.as_str()).or_insert(0) += 1;
                if seen.insert(t.as_str()) {
                    *df.entry(t.as_str()).or_insert(0) += 1;
                }
            }
        }

        let mut ranked: Vec<(&str, usize)> = total.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        ranked.truncate(opts.max_features);

        let mut terms: Vec<&str> = ranked.into_iter().map(|(t, _)| t).collect();
        terms.sort_unstable();

        let idf: Vec<f64> = terms
            .iter()
            .map(|t| {
                let d = df.get(t).copied().unwrap_or(0) as f64;
                ((1.0 + n_docs as f64) / (1.0 + d)).ln() + 1.0
            })
            .collect();
        let vocabulary: HashMap<String, usize> = terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.to_string(), i))
            .collect();

        let rows: Vec<SparseVector> = docs
            .iter()
            .map(|tokens| SparseVector::from_counts(count_terms(tokens, &vocabulary), &idf))
            .collect();

        debug!(
            rows = rows.len(),
            columns = vocabulary.len(),
            "built tf-idf index"
        );

        VectorIndex {
            vocabulary,
            idf,
            rows,
        }
    }

    /// Vectorize free text against the fixed vocabulary. Unknown terms are ignored.
    pub fn transform(&self, text: &str) -> SparseVector {
        let tokens = tokenize(text);
        SparseVector::from_counts(count_terms(&tokens, &self.vocabulary), &self.idf)
    }

    /// Cosine similarity of `query` against every row, indexed by article id.
    pub fn similarities(&self, query: &SparseVector) -> Vec<f64> {
        if query.is_zero() {
            return vec![0.0; self.rows.len()];
        }
        self.rows.iter().map(|row| row.dot(query)).collect()
    }

    /// Number of rows; always equal to the corpus length.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn column(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    pub fn row(&self, id: usize) -> Option<&SparseVector> {
        self.rows.get(id)
    }
}

fn count_terms(tokens: &[String], vocabulary: &HashMap<String, usize>) -> BTreeMap<usize, usize> {
    let mut counts = BTreeMap::new();
    for t in tokens {
        if let Some(&col) = vocabulary.get(t) {
            *counts.entry(col).or_insert(0) += 1;
        }
    }
    counts
}
