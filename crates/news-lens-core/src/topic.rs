//! Topic sanitization.
//!
//! Free-text topic labels are reduced to a [`TopicKey`]: a slug drawn from a
//! fixed set, with [`TopicKey::Default`] standing in for anything else. The
//! reduction is a two-step table:
//!
//! | Step | Input | Output |
//! |------|-------|--------|
//! | slug | `"  Sport "` | `"sport"` |
//! | slug | `"Tech News!!"` | `"tech-news"` |
//! | match | `"sport"` | `TopicKey::Sport` |
//! | match | `"tech-news"` | `TopicKey::Default` |

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static NON_ALNUM_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Sanitized topic slug, always one of the known topics or `default`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TopicKey {
    Politics,
    Sport,
    Economy,
    Tech,
    World,
    Culture,
    #[default]
    Default,
}

impl TopicKey {
    pub const ALL: [TopicKey; 7] = [
        TopicKey::Politics,
        TopicKey::Sport,
        TopicKey::Economy,
        TopicKey::Tech,
        TopicKey::World,
        TopicKey::Culture,
        TopicKey::Default,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TopicKey::Politics => "politics",
            TopicKey::Sport => "sport",
            TopicKey::Economy => "economy",
            TopicKey::Tech => "tech",
            TopicKey::World => "world",
            TopicKey::Culture => "culture",
            TopicKey::Default => "default",
        }
    }

    /// Exact slug lookup; `None` for anything outside the known set.
    pub fn from_slug(slug: &str) -> Option<TopicKey> {
        Self::ALL.iter().copied().find(|k| k.as_str() == slug)
    }

    /// Sanitizes a raw topic label. Missing or empty input yields `Default`.
    pub fn sanitize(raw: Option<&str>) -> TopicKey {
        raw.map(slugify)
            .and_then(|s| Self::from_slug(&s))
            .unwrap_or_default()
    }
}

impl fmt::Display for TopicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lowercase, trim, collapse non-alphanumeric runs to `-`, strip edge hyphens.
pub fn slugify(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    NON_ALNUM_RUN
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}
