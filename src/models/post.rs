use serde::{Deserialize, Serialize};

/// A blog post. The slug is derived from the title once at creation
/// time and doubles as the storage key; it never changes afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    pub slug: String,
    pub title: String,
    pub date: String,
    pub body_html: String,
    pub tags: Vec<String>,
    pub image_url: Option<String>,
    pub featured: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePost {
    pub title: String,
    pub date: String,
    #[serde(default)]
    pub body_html: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub featured: bool,
}

/// Partial update; the title stays editable but the slug does not
/// follow it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePost {
    pub title: Option<String>,
    pub date: Option<String>,
    pub body_html: Option<String>,
    pub tags: Option<Vec<String>>,
    pub image_url: Option<String>,
    pub featured: Option<bool>,
}

/// Listing row for the admin table and public cards.
#[derive(Debug, Clone, Serialize)]
pub struct PostSummary {
    pub slug: String,
    pub title: String,
    pub date: String,
    pub excerpt: String,
    pub tags: Vec<String>,
    pub image_url: Option<String>,
    pub featured: bool,
}
