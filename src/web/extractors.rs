use crate::models::User;
use crate::services::auth;
use crate::web::state::AppState;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;
use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub const SESSION_COOKIE: &str = "session";

fn session_user(state: &AppState, headers: &HeaderMap) -> Option<User> {
    let cookies = CookieJar::from_headers(headers);
    let token = cookies.get(SESSION_COOKIE)?.value().to_string();
    auth::validate_session(&state.db, &token).ok().flatten()
}

/// Requires a valid session; anonymous requests are bounced to the
/// login page instead of receiving a bare 401.
pub struct CurrentUser(pub User);

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = Response;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        state: &'life1 Arc<AppState>,
    ) -> Pin<Box<dyn Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>>
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        let state = state.clone();
        let headers = parts.headers.clone();
        Box::pin(async move {
            match session_user(&state, &headers) {
                Some(user) => Ok(CurrentUser(user)),
                None => Err(Redirect::to("/admin/login").into_response()),
            }
        })
    }
}

/// Resolves the session if one exists; public pages use this to show
/// the admin link to a logged-in operator.
pub struct OptionalUser(pub Option<User>);

impl FromRequestParts<Arc<AppState>> for OptionalUser {
    type Rejection = Infallible;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        state: &'life1 Arc<AppState>,
    ) -> Pin<Box<dyn Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>>
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        let state = state.clone();
        let headers = parts.headers.clone();
        Box::pin(async move { Ok(OptionalUser(session_user(&state, &headers))) })
    }
}
