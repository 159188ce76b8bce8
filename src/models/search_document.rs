// file: src/models/search_document.rs
// description: Normalized search provider response (knowledge graph + ranked organic results)
// reference: Serper search API response shape

use serde::{Deserialize, Deserializer, Serialize};

/// Providers send `null` for absent lists and strings as often as they omit the key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Structured entity summary a search provider returns for recognized entities.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KnowledgeGraph {
    pub title: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    #[serde(alias = "extra_phone")]
    pub extra_phone: Option<String>,
    pub email: Option<String>,
    pub description: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub social: Vec<String>,
}

impl KnowledgeGraph {
    /// Fields in the order they are presented to the language model.
    pub fn labeled_fields(&self) -> Vec<(&'static str, &str)> {
        [
            ("Title", self.title.as_deref()),
            ("Description", self.description.as_deref()),
            ("Website", self.website.as_deref()),
            ("Address", self.address.as_deref()),
            ("Phone", self.phone.as_deref()),
            ("Email", self.email.as_deref()),
        ]
        .into_iter()
        .filter_map(|(label, value)| value.map(|v| (label, v)))
        .collect()
    }
}

/// One ranked search result entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganicResult {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub snippet: String,
    #[serde(deserialize_with = "null_as_default")]
    pub link: String,
}

impl OrganicResult {
    pub fn new(
        title: impl Into<String>,
        snippet: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            snippet: snippet.into(),
            link: link.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchResultDocument {
    pub knowledge_graph: Option<KnowledgeGraph>,
    /// Rank order: earlier entries are higher confidence.
    #[serde(deserialize_with = "null_as_default")]
    pub organic: Vec<OrganicResult>,
}

impl SearchResultDocument {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_organic(organic: Vec<OrganicResult>) -> Self {
        Self {
            knowledge_graph: None,
            organic,
        }
    }

    pub fn with_knowledge_graph(mut self, knowledge_graph: KnowledgeGraph) -> Self {
        self.knowledge_graph = Some(knowledge_graph);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.knowledge_graph.is_none() && self.organic.is_empty()
    }

    /// Concatenation of every organic `title snippet ` pair, used by the text scanners.
    pub fn combined_text(&self) -> String {
        self.organic
            .iter()
            .map(|item| format!("{} {} ", item.title, item.snippet))
            .collect()
    }
}
