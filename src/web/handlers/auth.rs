use crate::services::auth;
use crate::web::error::AppResult;
use crate::web::extractors::SESSION_COOKIE;
use crate::web::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;
use std::sync::Arc;
use tera::Context;
use time::Duration;

pub async fn login_form(State(state): State<Arc<AppState>>) -> AppResult<Response> {
    if !auth::has_users(&state.db)? {
        return Ok(Redirect::to("/admin/setup").into_response());
    }

    let mut ctx = Context::new();
    ctx.insert("site", &state.config.site);
    let html = state.templates.render("admin/login.html", &ctx)?;
    Ok(Html(html).into_response())
}

#[derive(Deserialize)]
pub struct LoginForm {
    username: String,
    password: String,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    let rate_key = format!("login:{}", form.username);
    if !state.login_limiter.check(&rate_key) {
        let mut ctx = Context::new();
        ctx.insert("site", &state.config.site);
        ctx.insert("error", "Too many failed attempts. Try again later.");
        let html = state.templates.render("admin/login.html", &ctx)?;
        return Ok((StatusCode::TOO_MANY_REQUESTS, Html(html)).into_response());
    }

    match auth::authenticate(&state.db, &form.username, &form.password)? {
        Some(user) => {
            state.login_limiter.clear(&rate_key);
            let token = auth::create_session(&state.db, user.id, state.config.auth.session_days)?;
            let cookie = Cookie::build((SESSION_COOKIE, token))
                .path("/")
                .http_only(true)
                .max_age(Duration::days(state.config.auth.session_days))
                .build();

            Ok((jar.add(cookie), Redirect::to("/admin")).into_response())
        }
        None => {
            state.login_limiter.record_attempt(&rate_key);
            let mut ctx = Context::new();
            ctx.insert("site", &state.config.site);
            ctx.insert("error", "Invalid username or password");
            let html = state.templates.render("admin/login.html", &ctx)?;
            Ok((StatusCode::UNAUTHORIZED, Html(html)).into_response())
        }
    }
}

pub async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> AppResult<Response> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        let _ = auth::delete_session(&state.db, cookie.value());
    }

    let cookie = Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .max_age(Duration::ZERO)
        .build();

    Ok((jar.remove(cookie), Redirect::to("/admin/login")).into_response())
}

pub async fn setup_form(State(state): State<Arc<AppState>>) -> AppResult<Response> {
    if auth::has_users(&state.db)? {
        return Ok(Redirect::to("/admin/login").into_response());
    }

    let mut ctx = Context::new();
    ctx.insert("site", &state.config.site);
    let html = state.templates.render("admin/setup.html", &ctx)?;
    Ok(Html(html).into_response())
}

#[derive(Deserialize)]
pub struct SetupForm {
    username: String,
    email: String,
    password: String,
    password_confirm: String,
}

pub async fn setup(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<SetupForm>,
) -> AppResult<Response> {
    if auth::has_users(&state.db)? {
        return Ok(Redirect::to("/admin/login").into_response());
    }

    if form.password != form.password_confirm {
        let mut ctx = Context::new();
        ctx.insert("site", &state.config.site);
        ctx.insert("error", "Passwords do not match");
        let html = state.templates.render("admin/setup.html", &ctx)?;
        return Ok((StatusCode::BAD_REQUEST, Html(html)).into_response());
    }

    let user_id = match auth::create_user(&state.db, &form.username, &form.email, &form.password) {
        Ok(id) => id,
        Err(e) => {
            let mut ctx = Context::new();
            ctx.insert("site", &state.config.site);
            ctx.insert("error", &e.to_string());
            let html = state.templates.render("admin/setup.html", &ctx)?;
            return Ok((StatusCode::BAD_REQUEST, Html(html)).into_response());
        }
    };
    let token = auth::create_session(&state.db, user_id, state.config.auth.session_days)?;

    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .max_age(Duration::days(state.config.auth.session_days))
        .build();

    Ok((jar.add(cookie), Redirect::to("/admin")).into_response())
}
