use serde::{Deserialize, Serialize};

/// The singleton "about me" document, editable from the admin
/// settings page and rendered on /about.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AboutContent {
    pub intro: String,
    pub paragraph1: String,
    pub paragraph2: String,
    pub paragraph3: String,
    pub image_url: String,
    pub linkedin_url: String,
    pub orcid_url: String,
    pub email: String,
}
