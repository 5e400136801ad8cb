use anyhow::Result;
use std::path::PathBuf;

pub async fn run(path: PathBuf, name: Option<String>) -> Result<()> {
    let site_title = name.unwrap_or_else(|| "My Site".to_string());

    std::fs::create_dir_all(&path)?;
    std::fs::create_dir_all(path.join("data"))?;
    std::fs::create_dir_all(path.join("data/media"))?;

    let config = format!(
        r#"[site]
title = "{}"
description = "Reflections on technology and life"
url = "http://localhost:3000"
language = "en"

[server]
host = "127.0.0.1"
port = 3000

[database]
path = "./data/quill.db"

[content]
posts_per_page = 9
excerpt_length = 200

[media]
upload_dir = "./data/media"
max_upload_mb = 10

[auth]
session_days = 7
"#,
        site_title
    );

    std::fs::write(path.join("quill.toml"), config)?;

    tracing::info!("Created new site at {:?}", path);
    tracing::info!("Run 'quill migrate' to set up the database");
    tracing::info!("Run 'quill serve' to start the server");

    Ok(())
}
