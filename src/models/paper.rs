use serde::{Deserialize, Serialize};

/// A published paper or recommended article. Identity is an opaque
/// UUID assigned by the store, not derived from the title.
#[derive(Debug, Clone, Serialize)]
pub struct Paper {
    pub id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub year: String,
    pub link: String,
    pub abstract_text: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePaper {
    pub title: String,
    pub authors: Vec<String>,
    pub year: String,
    pub link: String,
    pub abstract_text: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePaper {
    pub title: Option<String>,
    pub authors: Option<Vec<String>>,
    pub year: Option<String>,
    pub link: Option<String>,
    pub abstract_text: Option<String>,
}
