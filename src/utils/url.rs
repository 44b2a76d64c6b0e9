//! Joining configured base URLs with API paths.

/// Strip trailing slashes so endpoint paths can be appended directly.
///
/// ```
/// use chatbuddy::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("https://xyz.supabase.co/"), "https://xyz.supabase.co");
/// assert_eq!(normalize_base_url("https://xyz.supabase.co"), "https://xyz.supabase.co");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Append `endpoint` to `base_url` with exactly one slash between them.
///
/// ```
/// use chatbuddy::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("https://xyz.supabase.co/", "/auth/v1/signup"),
///     "https://xyz.supabase.co/auth/v1/signup"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let endpoint = endpoint.trim_start_matches('/');
    format!("{}/{endpoint}", normalize_base_url(base_url))
}
