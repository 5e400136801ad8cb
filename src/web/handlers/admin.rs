use crate::models::{AboutContent, CreatePaper, CreatePost, UpdatePaper, UpdatePost, User};
use crate::services::posts::PostError;
use crate::services::{about, media, papers, posts};
use crate::web::error::AppResult;
use crate::web::extractors::CurrentUser;
use crate::web::state::AppState;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;
use std::sync::Arc;
use tera::Context;

fn make_admin_context(state: &AppState, user: &User) -> Context {
    let mut ctx = Context::new();
    ctx.insert("site", &state.config.site);
    ctx.insert("user", user);
    ctx.insert("version", env!("CARGO_PKG_VERSION"));
    ctx
}

pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Html<String>> {
    let post_count = posts::count_posts(&state.db)?;
    let paper_count = papers::count_papers(&state.db)?;
    let featured_count = posts::count_featured(&state.db)?;
    let recent: Vec<_> = posts::list_posts(&state.db, 5, 0)?
        .into_iter()
        .map(|p| posts::summarize(p, state.config.content.excerpt_length))
        .collect();

    let mut ctx = make_admin_context(&state, &user);
    ctx.insert("post_count", &post_count);
    ctx.insert("paper_count", &paper_count);
    ctx.insert("featured_count", &featured_count);
    ctx.insert("recent_posts", &recent);

    let html = state.templates.render("admin/dashboard.html", &ctx)?;
    Ok(Html(html))
}

// ---- Posts ----

pub async fn posts_index(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Html<String>> {
    let summaries = posts::list_summaries(&state.db, state.config.content.excerpt_length)?;

    let mut ctx = make_admin_context(&state, &user);
    ctx.insert("posts", &summaries);

    let html = state.templates.render("admin/posts/index.html", &ctx)?;
    Ok(Html(html))
}

#[derive(Default)]
struct PostFormData {
    title: String,
    date: String,
    body_html: String,
    tags: String,
    image_url: String,
    featured: bool,
    upload: Option<(String, Vec<u8>)>,
}

impl PostFormData {
    fn tag_list(&self) -> Vec<String> {
        self.tags
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    fn echo(&self) -> serde_json::Value {
        serde_json::json!({
            "title": self.title,
            "date": self.date,
            "body_html": self.body_html,
            "tags": self.tags,
            "image_url": self.image_url,
            "featured": self.featured,
        })
    }
}

async fn parse_post_form(mut multipart: Multipart) -> anyhow::Result<PostFormData> {
    let mut form = PostFormData::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "title" => form.title = field.text().await?,
            "date" => form.date = field.text().await?,
            "body_html" => form.body_html = field.text().await?,
            "tags" => form.tags = field.text().await?,
            "image_url" => form.image_url = field.text().await?,
            "featured" => form.featured = true,
            "image" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let data = field.bytes().await?;
                if !data.is_empty() {
                    form.upload = Some((filename, data.to_vec()));
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

fn render_post_form(
    state: &AppState,
    user: &User,
    form: serde_json::Value,
    is_new: bool,
    slug: Option<&str>,
    error: Option<&str>,
    status: StatusCode,
) -> AppResult<Response> {
    let mut ctx = make_admin_context(state, user);
    ctx.insert("form", &form);
    ctx.insert("is_new", &is_new);
    ctx.insert("slug", &slug);
    if let Some(e) = error {
        ctx.insert("error", e);
    }

    let html = state.templates.render("admin/posts/form.html", &ctx)?;
    Ok((status, Html(html)).into_response())
}

pub async fn new_post(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Response> {
    let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
    let form = serde_json::json!({
        "title": "", "date": today, "body_html": "", "tags": "",
        "image_url": "", "featured": false,
    });
    render_post_form(&state, &user, form, true, None, None, StatusCode::OK)
}

pub async fn create_post(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    multipart: Multipart,
) -> AppResult<Response> {
    let form = parse_post_form(multipart).await?;

    let image_url = match resolve_image(&state, &form) {
        Ok(url) => url,
        Err(e) => {
            return render_post_form(
                &state,
                &user,
                form.echo(),
                true,
                None,
                Some(&e.to_string()),
                StatusCode::BAD_REQUEST,
            )
        }
    };

    let input = CreatePost {
        title: form.title.clone(),
        date: form.date.clone(),
        body_html: form.body_html.clone(),
        tags: form.tag_list(),
        image_url,
        featured: form.featured,
    };

    match posts::create_post(&state.db, input) {
        Ok(_) => Ok(Redirect::to("/admin/posts").into_response()),
        Err(e) => match e.downcast_ref::<PostError>() {
            Some(perr) => {
                let status = match perr {
                    PostError::FeaturedLimitReached => StatusCode::CONFLICT,
                    PostError::SlugTaken(_) => StatusCode::CONFLICT,
                    PostError::EmptyTitle => StatusCode::BAD_REQUEST,
                    PostError::TitleTooLong => StatusCode::BAD_REQUEST,
                };
                render_post_form(
                    &state,
                    &user,
                    form.echo(),
                    true,
                    None,
                    Some(&perr.to_string()),
                    status,
                )
            }
            None => Err(e.into()),
        },
    }
}

pub async fn edit_post(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(slug): Path<String>,
) -> AppResult<Response> {
    match posts::get_post(&state.db, &slug)? {
        Some(p) => {
            let form = serde_json::json!({
                "title": p.title,
                "date": p.date,
                "body_html": p.body_html,
                "tags": p.tags.join(", "),
                "image_url": p.image_url.unwrap_or_default(),
                "featured": p.featured,
            });
            render_post_form(&state, &user, form, false, Some(&slug), None, StatusCode::OK)
        }
        None => Ok(StatusCode::NOT_FOUND.into_response()),
    }
}

pub async fn update_post(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(slug): Path<String>,
    multipart: Multipart,
) -> AppResult<Response> {
    if posts::get_post(&state.db, &slug)?.is_none() {
        return Ok(StatusCode::NOT_FOUND.into_response());
    }

    let form = parse_post_form(multipart).await?;

    let image_url = match resolve_image(&state, &form) {
        Ok(url) => url,
        Err(e) => {
            return render_post_form(
                &state,
                &user,
                form.echo(),
                false,
                Some(&slug),
                Some(&e.to_string()),
                StatusCode::BAD_REQUEST,
            )
        }
    };

    let input = UpdatePost {
        title: Some(form.title.clone()),
        date: Some(form.date.clone()),
        body_html: Some(form.body_html.clone()),
        tags: Some(form.tag_list()),
        image_url,
        featured: Some(form.featured),
    };

    match posts::update_post(&state.db, &slug, input) {
        Ok(()) => Ok(Redirect::to("/admin/posts").into_response()),
        Err(e) => match e.downcast_ref::<PostError>() {
            Some(perr) => render_post_form(
                &state,
                &user,
                form.echo(),
                false,
                Some(&slug),
                Some(&perr.to_string()),
                StatusCode::CONFLICT,
            ),
            None => Err(e.into()),
        },
    }
}

pub async fn delete_post(
    State(state): State<Arc<AppState>>,
    CurrentUser(_user): CurrentUser,
    Path(slug): Path<String>,
) -> AppResult<Response> {
    posts::delete_post(&state.db, &slug)?;
    Ok(Redirect::to("/admin/posts").into_response())
}

/// An uploaded file wins over a pasted URL, matching the original
/// form's behavior. Returns `None` when neither was provided so an
/// update keeps the stored value.
fn resolve_image(state: &AppState, form: &PostFormData) -> anyhow::Result<Option<String>> {
    if let Some((name, data)) = &form.upload {
        let url = media::store_image(
            &state.media_dir,
            name,
            data,
            state.config.media.max_upload_mb,
        )?;
        return Ok(Some(url));
    }
    if form.image_url.trim().is_empty() {
        Ok(None)
    } else {
        Ok(Some(form.image_url.trim().to_string()))
    }
}

// ---- Papers ----

pub async fn papers_index(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Html<String>> {
    let papers_list = papers::list_papers(&state.db)?;

    let mut ctx = make_admin_context(&state, &user);
    ctx.insert("papers", &papers_list);

    let html = state.templates.render("admin/papers/index.html", &ctx)?;
    Ok(Html(html))
}

#[derive(Deserialize)]
pub struct PaperForm {
    title: String,
    authors: String,
    year: String,
    link: String,
    abstract_text: String,
}

impl PaperForm {
    fn author_list(&self) -> Vec<String> {
        self.authors
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    fn echo(&self) -> serde_json::Value {
        serde_json::json!({
            "title": self.title,
            "authors": self.authors,
            "year": self.year,
            "link": self.link,
            "abstract_text": self.abstract_text,
        })
    }
}

fn render_paper_form(
    state: &AppState,
    user: &User,
    form: serde_json::Value,
    is_new: bool,
    id: Option<&str>,
    error: Option<&str>,
    status: StatusCode,
) -> AppResult<Response> {
    let mut ctx = make_admin_context(state, user);
    ctx.insert("form", &form);
    ctx.insert("is_new", &is_new);
    ctx.insert("paper_id", &id);
    if let Some(e) = error {
        ctx.insert("error", e);
    }

    let html = state.templates.render("admin/papers/form.html", &ctx)?;
    Ok((status, Html(html)).into_response())
}

pub async fn new_paper(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Response> {
    let year = chrono::Utc::now().format("%Y").to_string();
    let form = serde_json::json!({
        "title": "", "authors": "", "year": year, "link": "", "abstract_text": "",
    });
    render_paper_form(&state, &user, form, true, None, None, StatusCode::OK)
}

pub async fn create_paper(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<PaperForm>,
) -> AppResult<Response> {
    let input = CreatePaper {
        title: form.title.clone(),
        authors: form.author_list(),
        year: form.year.clone(),
        link: form.link.clone(),
        abstract_text: form.abstract_text.clone(),
    };

    match papers::create_paper(&state.db, input) {
        Ok(_) => Ok(Redirect::to("/admin/papers").into_response()),
        Err(e) => render_paper_form(
            &state,
            &user,
            form.echo(),
            true,
            None,
            Some(&e.to_string()),
            StatusCode::BAD_REQUEST,
        ),
    }
}

pub async fn edit_paper(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Response> {
    match papers::get_paper(&state.db, &id)? {
        Some(p) => {
            let form = serde_json::json!({
                "title": p.title,
                "authors": p.authors.join(", "),
                "year": p.year,
                "link": p.link,
                "abstract_text": p.abstract_text,
            });
            render_paper_form(&state, &user, form, false, Some(&id), None, StatusCode::OK)
        }
        None => Ok(StatusCode::NOT_FOUND.into_response()),
    }
}

pub async fn update_paper(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Form(form): Form<PaperForm>,
) -> AppResult<Response> {
    if papers::get_paper(&state.db, &id)?.is_none() {
        return Ok(StatusCode::NOT_FOUND.into_response());
    }

    let input = UpdatePaper {
        title: Some(form.title.clone()),
        authors: Some(form.author_list()),
        year: Some(form.year.clone()),
        link: Some(form.link.clone()),
        abstract_text: Some(form.abstract_text.clone()),
    };

    match papers::update_paper(&state.db, &id, input) {
        Ok(()) => Ok(Redirect::to("/admin/papers").into_response()),
        Err(e) => render_paper_form(
            &state,
            &user,
            form.echo(),
            false,
            Some(&id),
            Some(&e.to_string()),
            StatusCode::BAD_REQUEST,
        ),
    }
}

pub async fn delete_paper(
    State(state): State<Arc<AppState>>,
    CurrentUser(_user): CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Response> {
    papers::delete_paper(&state.db, &id)?;
    Ok(Redirect::to("/admin/papers").into_response())
}

// ---- About / settings ----

pub async fn settings(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Html<String>> {
    let about = about::get_about(&state.db)?;

    let mut ctx = make_admin_context(&state, &user);
    ctx.insert("about", &about);

    let html = state.templates.render("admin/settings.html", &ctx)?;
    Ok(Html(html))
}

pub async fn save_settings(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<AboutContent>,
) -> AppResult<Html<String>> {
    about::save_about(&state.db, &form)?;

    let mut ctx = make_admin_context(&state, &user);
    ctx.insert("about", &form);
    ctx.insert("saved", &true);

    let html = state.templates.render("admin/settings.html", &ctx)?;
    Ok(Html(html))
}
