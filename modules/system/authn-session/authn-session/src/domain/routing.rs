//! Route helpers used for logout and login redirects.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

// Literal pattern, compilation cannot fail.
#[allow(clippy::unwrap_used)]
static ABSOLUTE_URL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-z\-]+://").unwrap());

/// Normalize a route into an application-relative path.
///
/// Absolute URLs are returned unchanged. Otherwise the request `base`
/// prefix is stripped once, a leading `/` is forced, duplicate slashes
/// collapse and a trailing slash is dropped.
#[must_use]
pub fn normalize_route(route: &str, base: &str) -> String {
    if ABSOLUTE_URL.is_match(route) {
        return route.to_owned();
    }

    let route = if base.is_empty() {
        route
    } else {
        route.strip_prefix(base).unwrap_or(route)
    };

    let mut normalized = String::with_capacity(route.len() + 1);
    for ch in std::iter::once('/').chain(route.chars()) {
        if ch == '/' && normalized.ends_with('/') {
            continue;
        }
        normalized.push(ch);
    }

    if normalized.len() > 1 && normalized.ends_with('/') {
        normalized.pop();
    }

    normalized
}

/// Turn a user-supplied "redirect after login" value into a safe local target.
///
/// Values carrying a scheme or a host are rejected so the redirect cannot
/// leave the application. The fragment is dropped.
#[must_use]
pub fn sanitize_login_redirect(raw: &str) -> Option<String> {
    if raw.is_empty() || raw.starts_with("//") || Url::parse(raw).is_ok() {
        return None;
    }

    let without_fragment = raw.split('#').next().unwrap_or_default();
    let (path, query) = match without_fragment.split_once('?') {
        Some((path, query)) => (path, query),
        None => (without_fragment, ""),
    };

    let mut target = String::with_capacity(raw.len() + 1);
    if !path.starts_with('/') {
        target.push('/');
    }
    target.push_str(path);
    if !query.is_empty() {
        target.push('?');
        target.push_str(query);
    }

    Some(target)
}
