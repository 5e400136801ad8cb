use crate::web::security::RateLimiter;
use crate::{Config, Database};
use anyhow::Result;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tera::{Tera, Value};

pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub templates: Tera,
    pub media_dir: PathBuf,
    pub login_limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(config: Config, db: Database) -> Result<Self> {
        let mut templates = Tera::default();

        templates.register_filter("format_date", format_date_filter);
        templates.add_raw_templates(vec![
            ("base.html", include_str!("../../templates/base.html")),
            ("public/index.html", include_str!("../../templates/public/index.html")),
            ("public/blog.html", include_str!("../../templates/public/blog.html")),
            ("public/post.html", include_str!("../../templates/public/post.html")),
            ("public/papers.html", include_str!("../../templates/public/papers.html")),
            ("public/about.html", include_str!("../../templates/public/about.html")),
            ("public/404.html", include_str!("../../templates/public/404.html")),
            ("admin/base.html", include_str!("../../templates/admin/base.html")),
            ("admin/login.html", include_str!("../../templates/admin/login.html")),
            ("admin/setup.html", include_str!("../../templates/admin/setup.html")),
            ("admin/dashboard.html", include_str!("../../templates/admin/dashboard.html")),
            ("admin/posts/index.html", include_str!("../../templates/admin/posts/index.html")),
            ("admin/posts/form.html", include_str!("../../templates/admin/posts/form.html")),
            ("admin/papers/index.html", include_str!("../../templates/admin/papers/index.html")),
            ("admin/papers/form.html", include_str!("../../templates/admin/papers/form.html")),
            ("admin/settings.html", include_str!("../../templates/admin/settings.html")),
        ])?;

        let media_dir = PathBuf::from(&config.media.upload_dir);

        Ok(Self {
            config,
            db,
            templates,
            media_dir,
            login_limiter: Arc::new(RateLimiter::default()),
        })
    }
}

fn format_date_filter(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let date_str = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("format_date requires a string"))?;

    let format = args
        .get("format")
        .and_then(|v| v.as_str())
        .unwrap_or("%B %d, %Y");

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(date_str) {
        return Ok(Value::String(dt.format(format).to_string()));
    }

    if let Ok(d) = chrono::NaiveDate::parse_from_str(date_str, "%Y-%m-%d") {
        return Ok(Value::String(d.format(format).to_string()));
    }

    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(date_str, "%Y-%m-%d %H:%M:%S") {
        return Ok(Value::String(dt.format(format).to_string()));
    }

    Ok(Value::String(date_str.to_string()))
}
