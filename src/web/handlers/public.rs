use crate::models::User;
use crate::services::{about, papers, posts};
use crate::web::error::AppResult;
use crate::web::extractors::OptionalUser;
use crate::web::state::AppState;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use std::sync::Arc;
use tera::Context;

fn make_context(state: &AppState, user: &Option<User>) -> Context {
    let mut ctx = Context::new();
    ctx.insert("site", &state.config.site);
    ctx.insert("user", user);
    ctx
}

pub async fn index(
    State(state): State<Arc<AppState>>,
    OptionalUser(user): OptionalUser,
) -> AppResult<Html<String>> {
    let excerpt_length = state.config.content.excerpt_length;
    let featured: Vec<_> = posts::list_featured(&state.db)?
        .into_iter()
        .map(|p| posts::summarize(p, excerpt_length))
        .collect();
    let recent: Vec<_> = posts::list_posts(&state.db, state.config.content.posts_per_page, 0)?
        .into_iter()
        .map(|p| posts::summarize(p, excerpt_length))
        .collect();

    let mut ctx = make_context(&state, &user);
    ctx.insert("featured", &featured);
    ctx.insert("posts", &recent);

    let html = state.templates.render("public/index.html", &ctx)?;
    Ok(Html(html))
}

pub async fn blog(
    State(state): State<Arc<AppState>>,
    OptionalUser(user): OptionalUser,
) -> AppResult<Html<String>> {
    let summaries = posts::list_summaries(&state.db, state.config.content.excerpt_length)?;

    let mut ctx = make_context(&state, &user);
    ctx.insert("posts", &summaries);

    let html = state.templates.render("public/blog.html", &ctx)?;
    Ok(Html(html))
}

pub async fn post(
    State(state): State<Arc<AppState>>,
    OptionalUser(user): OptionalUser,
    Path(slug): Path<String>,
) -> AppResult<Response> {
    match posts::get_post(&state.db, &slug)? {
        Some(p) => {
            let mut ctx = make_context(&state, &user);
            ctx.insert("post", &p);

            let html = state.templates.render("public/post.html", &ctx)?;
            Ok(Html(html).into_response())
        }
        None => render_404(&state, &user),
    }
}

pub async fn papers_page(
    State(state): State<Arc<AppState>>,
    OptionalUser(user): OptionalUser,
) -> AppResult<Html<String>> {
    let papers_list = papers::list_papers(&state.db)?;

    let mut ctx = make_context(&state, &user);
    ctx.insert("papers", &papers_list);

    let html = state.templates.render("public/papers.html", &ctx)?;
    Ok(Html(html))
}

pub async fn about_page(
    State(state): State<Arc<AppState>>,
    OptionalUser(user): OptionalUser,
) -> AppResult<Html<String>> {
    let about = about::get_about(&state.db)?;

    let mut ctx = make_context(&state, &user);
    ctx.insert("about", &about);

    let html = state.templates.render("public/about.html", &ctx)?;
    Ok(Html(html))
}

pub async fn serve_media(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> AppResult<Response> {
    // Prevent path traversal attacks
    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        return Ok(StatusCode::NOT_FOUND.into_response());
    }

    let file_path = state.media_dir.join(&filename);

    let canonical_media = state.media_dir.canonicalize().unwrap_or_default();
    let canonical_file = match file_path.canonicalize() {
        Ok(p) => p,
        Err(_) => return Ok(StatusCode::NOT_FOUND.into_response()),
    };

    if !canonical_file.starts_with(&canonical_media) {
        return Ok(StatusCode::NOT_FOUND.into_response());
    }

    let content = tokio::fs::read(&file_path).await?;
    let mime = mime_guess::from_path(&filename).first_or_octet_stream();

    Ok(([(header::CONTENT_TYPE, mime.as_ref())], content).into_response())
}

pub async fn rss_feed(State(state): State<Arc<AppState>>) -> AppResult<Response> {
    let summaries = posts::list_summaries(&state.db, state.config.content.excerpt_length)?;
    let site = &state.config.site;

    let mut items = String::new();
    for post in summaries.iter().take(20) {
        items.push_str(&format!(
            r#"
    <item>
      <title>{}</title>
      <link>{}/blog/{}</link>
      <description><![CDATA[{}]]></description>
      <pubDate>{}</pubDate>
      <guid>{}/blog/{}</guid>
    </item>"#,
            html_escape(&post.title),
            site.url,
            post.slug,
            post.excerpt,
            rfc822_date(&post.date),
            site.url,
            post.slug
        ));
    }

    let rss = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:atom="http://www.w3.org/2005/Atom">
  <channel>
    <title>{}</title>
    <link>{}</link>
    <description>{}</description>
    <language>{}</language>
    <atom:link href="{}/feed.xml" rel="self" type="application/rss+xml"/>
    {}
  </channel>
</rss>"#,
        html_escape(&site.title),
        site.url,
        html_escape(&site.description),
        site.language,
        site.url,
        items
    );

    Ok((
        [(header::CONTENT_TYPE, "application/rss+xml; charset=utf-8")],
        rss,
    )
        .into_response())
}

pub async fn not_found(
    State(state): State<Arc<AppState>>,
    OptionalUser(user): OptionalUser,
) -> AppResult<Response> {
    render_404(&state, &user)
}

fn render_404(state: &AppState, user: &Option<User>) -> AppResult<Response> {
    let ctx = make_context(state, user);
    let html = state.templates.render("public/404.html", &ctx)?;
    Ok((StatusCode::NOT_FOUND, Html(html)).into_response())
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

// RSS 2.0 wants RFC 822 dates; post dates are stored as YYYY-MM-DD.
fn rfc822_date(date: &str) -> String {
    chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|d| d.format("%a, %d %b %Y 00:00:00 +0000").to_string())
        .unwrap_or_else(|_| date.to_string())
}

#[cfg(test)]
mod tests {
    use super::rfc822_date;

    #[test]
    fn test_rfc822_date_from_stored_format() {
        assert_eq!(rfc822_date("2025-06-01"), "Sun, 01 Jun 2025 00:00:00 +0000");
    }

    #[test]
    fn test_rfc822_date_passes_through_unparseable() {
        assert_eq!(rfc822_date("not a date"), "not a date");
    }
}
