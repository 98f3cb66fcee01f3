use axum::extract::{Path, State};
use axum::http::header::{HOST, LOCATION};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use tinyfix_core::ShortCode;
use tracing::debug;

use crate::error::{AppError, Result};
use crate::model::ShortenForm;
use crate::state::AppState;

const START_PAGE: &str = r#"<!doctype html>
<html>
  <head><title>tinyfix</title></head>
  <body>
    <form method="post" action="/">
      <label for="url">url:</label>
      <input id="url" name="url" type="text" maxlength="2048">
      <input type="submit" value="Shorten">
    </form>
  </body>
</html>
"#;

pub async fn start_page_handler() -> Html<&'static str> {
    Html(START_PAGE)
}

pub async fn shorten_handler(
    State(state): State<AppState>,
    Form(form): Form<ShortenForm>,
) -> Result<String> {
    let url = form.validate()?;
    let code = state.shortener().shorten(&url).await?;

    debug!(code = %code, url = %url, "shortened url");
    Ok(state.short_link(&code))
}

pub async fn redirect_handler(
    State(state): State<AppState>,
    Path(short_code): Path<String>,
    headers: HeaderMap,
) -> Result<Response> {
    let host = headers
        .get(HOST)
        .and_then(|value| value.to_str().ok())
        .map(strip_port);
    if host != Some(state.fqdn()) {
        return Err(AppError::UnknownHost);
    }

    let code = ShortCode::new(short_code).map_err(|_| AppError::UnknownFormat)?;

    let url = state
        .shortener()
        .unshorten(&code)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok((StatusCode::FOUND, [(LOCATION, url.into_string())]).into_response())
}

/// Drops a trailing `:port`, leaving bracketed IPv6 literals intact.
fn strip_port(authority: &str) -> &str {
    match authority.rsplit_once(':') {
        Some((host, port)) if !port.contains(']') => host,
        _ => authority,
    }
}
