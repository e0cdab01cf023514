//! Configuration for cinema-db.
//!
//! Resolves the connection target from the environment and holds the fixed
//! option set handed to the driver.

/// Environment variable that overrides the connection target.
pub const MONGO_URI_ENV: &str = "MONGO_URI";

/// Target used when no override is supplied.
pub const DEFAULT_MONGO_URI: &str = "mongodb://127.0.0.1:27017/cinema";

/// Database used when the target names none.
pub const DEFAULT_DATABASE: &str = "cinema";

/// Application name reported to the server.
pub const APP_NAME: &str = "cinema-db";

/// Options passed to the driver alongside the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectOptions {
    /// Legacy URL parser compatibility flag. Accepted for driver-version
    /// compatibility; it does not change how the target is parsed.
    pub use_new_url_parser: bool,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            use_new_url_parser: true,
        }
    }
}

/// Resolves the connection target.
///
/// A non-empty override is returned verbatim. Malformed strings are left for
/// the driver to report when the connection is attempted.
pub fn resolve_target(override_target: Option<String>) -> String {
    match override_target {
        Some(target) if !target.is_empty() => target,
        _ => DEFAULT_MONGO_URI.to_string(),
    }
}

/// Resolves the connection target from `MONGO_URI`.
pub fn target_from_env() -> String {
    resolve_target(std::env::var(MONGO_URI_ENV).ok())
}

/// Returns the target with any credentials replaced by `***`, for logging.
pub fn redact_target(target: &str) -> String {
    let Some((scheme, rest)) = target.split_once("://") else {
        return target.to_string();
    };
    let authority_end = rest.find(|c: char| c == '/' || c == '?').unwrap_or(rest.len());

    match rest[..authority_end].rfind('@') {
        Some(at) => format!("{scheme}://***@{}", &rest[at + 1..]),
        None => target.to_string(),
    }
}

/// Extracts the database name from the path of a target, if any.
pub fn database_from_target(target: &str) -> Option<String> {
    let (_, rest) = target.split_once("://")?;
    let path = &rest[rest.find('/')? + 1..];
    let name = path.split('?').next().unwrap_or_default();

    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
