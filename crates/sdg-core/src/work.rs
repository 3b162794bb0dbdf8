//! OpenAlex work records, reduced to the fields used for classification.

use serde::Deserialize;

use crate::abstract_index::InvertedIndex;

/// A scholarly work as returned by `GET /works/doi:{doi}`.
///
/// Every field is optional; OpenAlex omits or nulls whatever it lacks.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Work {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub doi: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub abstract_inverted_index: Option<InvertedIndex>,
    #[serde(default)]
    pub primary_topic: Option<Topic>,
    #[serde(default)]
    pub keywords: Option<Vec<Keyword>>,
    #[serde(default)]
    pub concepts: Option<Vec<Concept>>,
    #[serde(default)]
    pub mesh: Option<Vec<MeshTerm>>,
}

/// Topic with its place in the subfield → field → domain hierarchy.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Topic {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub subfield: Option<TopicLevel>,
    #[serde(default)]
    pub field: Option<TopicLevel>,
    #[serde(default)]
    pub domain: Option<TopicLevel>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TopicLevel {
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Keyword {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Concept {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub level: Option<u32>,
    #[serde(default)]
    pub score: Option<f64>,
}

/// Medical Subject Headings descriptor attached to PubMed-indexed works.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MeshTerm {
    #[serde(default)]
    pub descriptor_name: Option<String>,
    #[serde(default)]
    pub is_major_topic: Option<bool>,
}

impl Work {
    /// `title`, falling back to `display_name`.
    pub fn title(&self) -> Option<&str> {
        self.title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .or(self.display_name.as_deref())
    }
}
