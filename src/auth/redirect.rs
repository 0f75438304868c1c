//! Where to send a user after they log in.
//!
//! The log-in page accepts a `redirect_url` query parameter so that a user who
//! was bounced from a protected page lands back on it. Only local paths are
//! accepted to avoid open redirects.

use axum::{
    extract::Request,
    http::{HeaderMap, Uri},
};

use crate::endpoints;

/// Return the path and query of `raw_url` if it is a safe place to redirect to.
///
/// Absolute URLs, protocol relative URLs (`//evil.com`) and the log-in page
/// itself are rejected.
pub fn normalize_redirect_url(raw_url: &str) -> Option<String> {
    let uri = raw_url.parse::<Uri>().ok()?;
    if uri.scheme().is_some() || uri.authority().is_some() {
        return None;
    }

    local_path_and_query(&uri)
}

fn local_path_and_query(uri: &Uri) -> Option<String> {
    let path_and_query = uri.path_and_query()?.as_str();

    if !path_and_query.starts_with('/') || path_and_query.starts_with("//") {
        return None;
    }

    if uri.path() == endpoints::LOG_IN_VIEW {
        return None;
    }

    Some(path_and_query.to_owned())
}

/// The page the user was looking at when an HTMX request was made, taken from
/// the `HX-Current-URL` header.
fn hx_current_url(headers: &HeaderMap) -> Option<String> {
    let is_hx_request = headers
        .get("hx-request")
        .and_then(|header| header.to_str().ok())
        .is_some_and(|header| header.eq_ignore_ascii_case("true"));

    if !is_hx_request {
        tracing::warn!("Missing HX-Request header for /api request.");
        return None;
    }

    let current_url = headers
        .get("hx-current-url")
        .and_then(|header| header.to_str().ok())?;

    // The header holds an absolute URL, only keep the local part of it.
    let uri = current_url.parse::<Uri>().ok()?;
    local_path_and_query(&uri)
}

/// Build the URL of the log-in page with `redirect_url` set to `target`.
pub fn log_in_url_with_redirect(target: &str) -> String {
    match serde_urlencoded::to_string([("redirect_url", target)]) {
        Ok(query) => format!("{}?{}", endpoints::LOG_IN_VIEW, query),
        Err(error) => {
            tracing::error!("Could not encode redirect URL {target}: {error}");
            endpoints::LOG_IN_VIEW.to_owned()
        }
    }
}

/// Build the URL of the log-in page that returns the user to the page behind `request`.
///
/// For `/api` routes the page is read from the HTMX headers since the API
/// route itself is not something to return to. Falls back to the dashboard.
pub fn build_log_in_redirect_url(request: &Request) -> String {
    let target = if request.uri().path().starts_with("/api") {
        hx_current_url(request.headers())
    } else {
        local_path_and_query(request.uri())
    };

    let target = target.unwrap_or_else(|| {
        tracing::warn!(
            "Could not determine redirect target for {}. Falling back to dashboard.",
            request.uri()
        );
        endpoints::DASHBOARD_VIEW.to_owned()
    });

    log_in_url_with_redirect(&target)
}
