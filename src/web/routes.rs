use crate::web::handlers::{admin, auth, public};
use crate::web::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(public::index))
        .route("/blog", get(public::blog))
        .route("/blog/:slug", get(public::post))
        .route("/papers", get(public::papers_page))
        .route("/about", get(public::about_page))
        .route("/feed.xml", get(public::rss_feed))
        .route("/media/*path", get(public::serve_media))
}

pub fn admin_routes(max_upload_mb: usize) -> Router<Arc<AppState>> {
    let upload_limit = DefaultBodyLimit::max(upload_body_limit(max_upload_mb));

    Router::new()
        .route("/admin/login", get(auth::login_form).post(auth::login))
        .route("/admin/logout", post(auth::logout))
        .route("/admin/setup", get(auth::setup_form).post(auth::setup))
        .route("/admin", get(admin::dashboard))
        .route("/admin/posts", get(admin::posts_index))
        .route(
            "/admin/posts/new",
            get(admin::new_post).post(admin::create_post).layer(upload_limit.clone()),
        )
        .route(
            "/admin/posts/:slug/edit",
            get(admin::edit_post).post(admin::update_post).layer(upload_limit),
        )
        .route("/admin/posts/:slug/delete", post(admin::delete_post))
        .route("/admin/papers", get(admin::papers_index))
        .route(
            "/admin/papers/new",
            get(admin::new_paper).post(admin::create_paper),
        )
        .route(
            "/admin/papers/:id/edit",
            get(admin::edit_paper).post(admin::update_paper),
        )
        .route("/admin/papers/:id/delete", post(admin::delete_paper))
        .route(
            "/admin/settings",
            get(admin::settings).post(admin::save_settings),
        )
}

// The post form's multipart framing and text fields ride along with
// the image bytes, so the request cap sits above the configured
// image cap.
fn upload_body_limit(max_upload_mb: usize) -> usize {
    (max_upload_mb + 2) * 1024 * 1024
}
