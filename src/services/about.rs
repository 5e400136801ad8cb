use crate::models::AboutContent;
use crate::services::settings::{get_setting, set_setting};
use crate::Database;
use anyhow::Result;

// About document keys in the settings table
const ABOUT_INTRO: &str = "about_intro";
const ABOUT_PARAGRAPH1: &str = "about_paragraph1";
const ABOUT_PARAGRAPH2: &str = "about_paragraph2";
const ABOUT_PARAGRAPH3: &str = "about_paragraph3";
const ABOUT_IMAGE_URL: &str = "about_image_url";
const ABOUT_LINKEDIN_URL: &str = "about_linkedin_url";
const ABOUT_ORCID_URL: &str = "about_orcid_url";
const ABOUT_EMAIL: &str = "about_email";

/// Load the singleton about document, empty strings for anything not
/// yet written.
pub fn get_about(db: &Database) -> Result<AboutContent> {
    Ok(AboutContent {
        intro: get_setting(db, ABOUT_INTRO)?.unwrap_or_default(),
        paragraph1: get_setting(db, ABOUT_PARAGRAPH1)?.unwrap_or_default(),
        paragraph2: get_setting(db, ABOUT_PARAGRAPH2)?.unwrap_or_default(),
        paragraph3: get_setting(db, ABOUT_PARAGRAPH3)?.unwrap_or_default(),
        image_url: get_setting(db, ABOUT_IMAGE_URL)?.unwrap_or_default(),
        linkedin_url: get_setting(db, ABOUT_LINKEDIN_URL)?.unwrap_or_default(),
        orcid_url: get_setting(db, ABOUT_ORCID_URL)?.unwrap_or_default(),
        email: get_setting(db, ABOUT_EMAIL)?.unwrap_or_default(),
    })
}

/// Upsert the whole about document.
pub fn save_about(db: &Database, about: &AboutContent) -> Result<()> {
    set_setting(db, ABOUT_INTRO, &about.intro)?;
    set_setting(db, ABOUT_PARAGRAPH1, &about.paragraph1)?;
    set_setting(db, ABOUT_PARAGRAPH2, &about.paragraph2)?;
    set_setting(db, ABOUT_PARAGRAPH3, &about.paragraph3)?;
    set_setting(db, ABOUT_IMAGE_URL, &about.image_url)?;
    set_setting(db, ABOUT_LINKEDIN_URL, &about.linkedin_url)?;
    set_setting(db, ABOUT_ORCID_URL, &about.orcid_url)?;
    set_setting(db, ABOUT_EMAIL, &about.email)?;
    Ok(())
}
