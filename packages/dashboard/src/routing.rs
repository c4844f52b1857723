/// Path prefixes that never go through host routing: API routes, build assets
/// and the favicon.
const EXCLUDED_PREFIXES: [&str; 4] = ["api", "_next/static", "_next/image", "favicon.ico"];

pub const DASHBOARD_ROUTE: &str = "/dashboard";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Serve this internal path; the browser keeps the original URL
    Rewrite(String),
    Passthrough,
}

/// Whether routing applies to `path` at all.
pub fn is_routed_path(path: &str) -> bool {
    let rest = path.strip_prefix('/').unwrap_or(path);
    !EXCLUDED_PREFIXES
        .iter()
        .any(|prefix| rest.starts_with(prefix))
}

/// Requests to the app host are served from the dashboard route.
///
/// `host` is compared verbatim against `app_host`, port included.
pub fn route_request(host: Option<&str>, path: &str, app_host: &str) -> Route {
    if !is_routed_path(path) || host != Some(app_host) {
        return Route::Passthrough;
    }

    let path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };
    log::debug!("rewriting {path} on {app_host}");
    Route::Rewrite(format!("{DASHBOARD_ROUTE}{path}"))
}
