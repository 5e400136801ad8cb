use crate::models::{CreatePost, Post, PostSummary, UpdatePost};
use crate::services::body;
use crate::services::featured::{can_set_featured, FEATURED_LIMIT};
use crate::services::slug::{derive_slug, validate_slug};
use crate::Database;
use anyhow::Result;
use rusqlite::OptionalExtension;
use thiserror::Error;

/// Validation failures the admin UI surfaces to the operator. Storage
/// and connection errors stay as opaque `anyhow` errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PostError {
    #[error("cannot derive identifier from empty title")]
    EmptyTitle,
    #[error("title is too long to form a link identifier")]
    TitleTooLong,
    #[error("only {} posts can be featured at once; un-feature another post first", FEATURED_LIMIT)]
    FeaturedLimitReached,
    #[error("a post with the identifier '{0}' already exists; choose a different title")]
    SlugTaken(String),
}

/// Creates a post keyed by the slug derived from its title.
///
/// The slug is computed exactly once here; edits never change it. A
/// title that normalizes to nothing is rejected before any write, and
/// so is a slug that is already taken (the original document store
/// silently merged into the existing record instead).
pub fn create_post(db: &Database, input: CreatePost) -> Result<String> {
    let slug = derive_slug(&input.title);
    if slug.is_empty() {
        return Err(PostError::EmptyTitle.into());
    }
    // A derived slug already satisfies the charset and hyphen rules,
    // so the only way it can fail validation is by length.
    if !validate_slug(&slug) {
        return Err(PostError::TitleTooLong.into());
    }

    let conn = db.get()?;

    let exists: Option<String> = conn
        .query_row("SELECT slug FROM posts WHERE slug = ?", [&slug], |row| {
            row.get(0)
        })
        .optional()?;
    if exists.is_some() {
        return Err(PostError::SlugTaken(slug).into());
    }

    if input.featured {
        let current = count_featured_conn(&conn)?;
        if !can_set_featured(current, true, false) {
            return Err(PostError::FeaturedLimitReached.into());
        }
    }

    let body_html = body::sanitize_html(&input.body_html);
    conn.execute(
        "INSERT INTO posts (slug, title, date, body_html, tags, image_url, featured)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
        (
            &slug,
            &input.title,
            &input.date,
            &body_html,
            serde_json::to_string(&input.tags)?,
            &input.image_url,
            input.featured,
        ),
    )?;

    Ok(slug)
}

/// Applies a partial update to the post stored under `slug`.
///
/// Featuring an un-featured post consults the guard against the live
/// featured count; un-featuring and re-saving an already-featured post
/// are always allowed.
pub fn update_post(db: &Database, slug: &str, input: UpdatePost) -> Result<()> {
    let conn = db.get()?;

    let current = conn
        .query_row(
            "SELECT slug, title, date, body_html, tags, image_url, featured, created_at, updated_at
             FROM posts WHERE slug = ?",
            [slug],
            row_to_post,
        )
        .optional()?;
    let current = match current {
        Some(p) => p,
        None => anyhow::bail!("post not found: {}", slug),
    };

    let featured = input.featured.unwrap_or(current.featured);
    if featured != current.featured && featured {
        let count = count_featured_conn(&conn)?;
        if !can_set_featured(count, true, current.featured) {
            return Err(PostError::FeaturedLimitReached.into());
        }
    }

    let title = input.title.unwrap_or(current.title);
    let date = input.date.unwrap_or(current.date);
    let body_html = match input.body_html {
        Some(b) => body::sanitize_html(&b),
        None => current.body_html,
    };
    let tags = input.tags.unwrap_or(current.tags);
    let image_url = input.image_url.or(current.image_url);

    conn.execute(
        "UPDATE posts SET title = ?, date = ?, body_html = ?, tags = ?, image_url = ?,
         featured = ?, updated_at = CURRENT_TIMESTAMP WHERE slug = ?",
        (
            &title,
            &date,
            &body_html,
            serde_json::to_string(&tags)?,
            &image_url,
            featured,
            slug,
        ),
    )?;

    Ok(())
}

pub fn delete_post(db: &Database, slug: &str) -> Result<()> {
    let conn = db.get()?;
    conn.execute("DELETE FROM posts WHERE slug = ?", [slug])?;
    Ok(())
}

pub fn get_post(db: &Database, slug: &str) -> Result<Option<Post>> {
    let conn = db.get()?;
    let post = conn
        .query_row(
            "SELECT slug, title, date, body_html, tags, image_url, featured, created_at, updated_at
             FROM posts WHERE slug = ?",
            [slug],
            row_to_post,
        )
        .optional()?;
    Ok(post)
}

pub fn list_posts(db: &Database, limit: usize, offset: usize) -> Result<Vec<Post>> {
    let conn = db.get()?;
    let mut stmt = conn.prepare(
        "SELECT slug, title, date, body_html, tags, image_url, featured, created_at, updated_at
         FROM posts ORDER BY date DESC LIMIT ? OFFSET ?",
    )?;
    let posts = stmt
        .query_map((limit, offset), row_to_post)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(posts)
}

/// Listing rows with a plain-text excerpt instead of the full body.
pub fn list_summaries(db: &Database, excerpt_length: usize) -> Result<Vec<PostSummary>> {
    let posts = list_posts(db, 1000, 0)?;
    Ok(posts.into_iter().map(|p| summarize(p, excerpt_length)).collect())
}

/// The posts shown in the landing page's highlighted slots, newest
/// first. Never more than the cap, by invariant.
pub fn list_featured(db: &Database) -> Result<Vec<Post>> {
    let conn = db.get()?;
    let mut stmt = conn.prepare(
        "SELECT slug, title, date, body_html, tags, image_url, featured, created_at, updated_at
         FROM posts WHERE featured = 1 ORDER BY date DESC LIMIT ?",
    )?;
    let posts = stmt
        .query_map([FEATURED_LIMIT], row_to_post)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(posts)
}

pub fn count_featured(db: &Database) -> Result<usize> {
    let conn = db.get()?;
    count_featured_conn(&conn)
}

pub fn count_posts(db: &Database) -> Result<usize> {
    let conn = db.get()?;
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM posts", [], |row| row.get(0))?;
    Ok(count as usize)
}

fn count_featured_conn(conn: &rusqlite::Connection) -> Result<usize> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM posts WHERE featured = 1",
        [],
        |row| row.get(0),
    )?;
    Ok(count as usize)
}

pub fn summarize(post: Post, excerpt_length: usize) -> PostSummary {
    PostSummary {
        excerpt: body::text_excerpt(&post.body_html, excerpt_length),
        slug: post.slug,
        title: post.title,
        date: post.date,
        tags: post.tags,
        image_url: post.image_url,
        featured: post.featured,
    }
}

fn row_to_post(row: &rusqlite::Row) -> rusqlite::Result<Post> {
    let tags: Vec<String> =
        serde_json::from_str(&row.get::<_, String>(4)?).unwrap_or_default();
    Ok(Post {
        slug: row.get(0)?,
        title: row.get(1)?,
        date: row.get(2)?,
        body_html: row.get(3)?,
        tags,
        image_url: row.get(5)?,
        featured: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}
