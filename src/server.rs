//! HTTP surface: routing, locale redirect, page responses and the
//! response-wide security headers.
//!
//! URL shape is `/{locale}/{slug?}`. A request with no locale segment is
//! redirected once, at this boundary, to the detected initial locale.
//! An unsupported locale segment redirects to the default locale's root;
//! an unknown slug under a valid locale renders that locale's not-found
//! page. Settling any valid locale persists it as the preference cookie.

use axum::extract::{Path, Request, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode, Uri};
use axum::middleware::{self, Next};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::contact;
use crate::i18n::{routes, ContentLibrary, Locale};
use crate::pages;

/// Name of the stored locale preference cookie.
pub const LOCALE_COOKIE: &str = "brightflow-lang";

/// Shared application state, constructed once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub content: Arc<ContentLibrary>,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: Config, content: ContentLibrary) -> AppState {
        AppState {
            config: Arc::new(config),
            content: Arc::new(content),
            http: reqwest::Client::new(),
        }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_redirect))
        .route("/api/contact", post(contact::submit))
        .route("/:locale", get(locale_home))
        .route("/:locale/:slug", get(locale_page))
        .fallback(fallback)
        .layer(middleware::from_fn(security_headers))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET / — the sole place the initial locale is detected.
async fn root_redirect(headers: HeaderMap) -> Redirect {
    let stored = preference_cookie(&headers);
    let accept_language = headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok());

    let locale = Locale::detect_initial(stored.as_deref(), accept_language);
    info!("redirecting locale-less entry to /{}", locale);
    Redirect::temporary(&format!("/{}", locale))
}

/// GET /:locale — the locale root (home route).
async fn locale_home(Path(locale): Path<String>, State(state): State<AppState>) -> Response {
    match Locale::from_code(&locale) {
        Some(locale) => {
            let html = pages::render_route(
                locale,
                routes::RouteKey::Home,
                &state.content,
                &state.config.public_base_url,
            );
            page_response(StatusCode::OK, locale, html)
        }
        None => default_locale_redirect().into_response(),
    }
}

/// GET /:locale/:slug — a localized content page.
async fn locale_page(
    Path((locale, slug)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Response {
    let Some(locale) = Locale::from_code(&locale) else {
        return default_locale_redirect().into_response();
    };

    match routes::slug_to_route_key(&slug) {
        Some(route) => {
            let html =
                pages::render_route(locale, route, &state.content, &state.config.public_base_url);
            page_response(StatusCode::OK, locale, html)
        }
        None => {
            let html =
                pages::render_not_found(locale, &state.content, &state.config.public_base_url);
            page_response(StatusCode::NOT_FOUND, locale, html)
        }
    }
}

/// Any deeper or otherwise unmatched path: a valid locale segment keeps
/// the user inside that locale's not-found page, everything else goes to
/// the default locale's root.
async fn fallback(State(state): State<AppState>, uri: Uri) -> Response {
    let segment = uri.path().trim_start_matches('/').split('/').next().unwrap_or("");
    match Locale::from_code(segment) {
        Some(locale) => {
            let html =
                pages::render_not_found(locale, &state.content, &state.config.public_base_url);
            page_response(StatusCode::NOT_FOUND, locale, html)
        }
        None => default_locale_redirect().into_response(),
    }
}

fn default_locale_redirect() -> Redirect {
    Redirect::temporary(&format!("/{}", Locale::DEFAULT))
}

/// An HTML page response that also settles the locale preference cookie.
fn page_response(status: StatusCode, locale: Locale, html: String) -> Response {
    let mut response = (status, Html(html)).into_response();
    let cookie = format!(
        "{}={}; Path=/; Max-Age=31536000; SameSite=Lax",
        LOCALE_COOKIE,
        locale.code()
    );
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        response.headers_mut().insert(header::SET_COOKIE, value);
    }
    response
}

/// Read the stored locale preference from the Cookie header.
fn preference_cookie(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    for pair in raw.split(';') {
        if let Some((name, value)) = pair.trim().split_once('=') {
            if name.trim() == LOCALE_COOKIE {
                return Some(value.trim().to_string());
            }
        }
    }
    None
}

/// Security headers applied to every response.
async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert("x-frame-options", HeaderValue::from_static("SAMEORIGIN"));
    headers.insert("x-content-type-options", HeaderValue::from_static("nosniff"));
    headers.insert(
        "referrer-policy",
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(
        "strict-transport-security",
        HeaderValue::from_static("max-age=31536000; includeSubDomains"),
    );
    headers.insert(
        "permissions-policy",
        HeaderValue::from_static(
            "accelerometer=(),camera=(),geolocation=(),gyroscope=(),magnetometer=(),microphone=(),payment=(),usb=()",
        ),
    );
    // The bot-check widget needs the Google origins.
    headers.insert(
        "content-security-policy",
        HeaderValue::from_static(
            "default-src 'self'; \
             script-src 'self' 'unsafe-inline' https://www.google.com https://www.gstatic.com; \
             style-src 'self' 'unsafe-inline' https://fonts.googleapis.com; \
             font-src 'self' https://fonts.gstatic.com; \
             img-src 'self' data: https:; \
             frame-src https://www.google.com https://www.recaptcha.net; \
             frame-ancestors 'none'; \
             connect-src 'self' https://www.google.com",
        ),
    );

    response
}
