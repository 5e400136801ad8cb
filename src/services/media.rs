use anyhow::{bail, Result};
use std::path::Path;
use uuid::Uuid;

const ALLOWED_IMAGE_MIMES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Stores an uploaded cover image under a UUID filename and returns
/// the public URL path it will be served from.
///
/// The bytes are sniffed rather than trusting the client's declared
/// content type; anything that is not a common web image is rejected.
pub fn store_image(
    upload_dir: &Path,
    original_name: &str,
    data: &[u8],
    max_upload_mb: usize,
) -> Result<String> {
    if data.is_empty() {
        bail!("Uploaded file is empty");
    }
    let max_bytes = max_upload_mb * 1024 * 1024;
    if data.len() > max_bytes {
        bail!(
            "File too large: {} bytes (max {} MB)",
            data.len(),
            max_upload_mb
        );
    }

    let kind = infer::get(data);
    let mime = kind.map(|k| k.mime_type()).unwrap_or("");
    if !ALLOWED_IMAGE_MIMES.contains(&mime) {
        bail!("Only JPEG, PNG, GIF, and WebP images can be uploaded");
    }

    let extension = kind
        .map(|k| k.extension())
        .filter(|e| !e.is_empty())
        .map(|e| e.to_string())
        .or_else(|| {
            Path::new(original_name)
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.to_string())
        })
        .unwrap_or_else(|| "bin".to_string());

    let filename = format!("{}.{}", Uuid::new_v4(), extension);

    std::fs::create_dir_all(upload_dir)?;
    std::fs::write(upload_dir.join(&filename), data)?;

    Ok(format!("/media/{}", filename))
}
