//! Filesystem path sanitization.
//!
//! Replaces the user-name segment of well-known user-root conventions
//! with `<user>`. Telemetry may describe paths from a different OS than
//! the one scrubbing them (cross-platform bug reports), so both separator
//! conventions are always handled, regardless of the host platform.

use once_cell::sync::Lazy;
use regex::Regex;

/// Placeholder substituted for user-name path segments.
pub const USER_PLACEHOLDER: &str = "<user>";

// Generic user-root patterns. These cover paths belonging to *other*
// users, not just the one running this process. A segment stops at either
// separator so mixed-style paths cannot smuggle a username through.
static RE_MACOS_USERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(/Users/)[^/\\]+").expect("macOS user-root pattern"));

static RE_LINUX_HOME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(/home/)[^/\\]+").expect("Linux user-root pattern"));

static RE_WINDOWS_USERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\\Users\\)[^\\/]+").expect("Windows user-root pattern"));

// Strings that went through escaping (JSON, debug formatting) carry
// doubled backslashes; the single-backslash rule cannot see through them.
static RE_WINDOWS_USERS_ESCAPED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\\\\Users\\\\)[^\\/]+").expect("escaped Windows user-root pattern"));

/// Remove user names from a filesystem path.
///
/// The current user's home directory (as reported by `HOME` or
/// `USERPROFILE`) is handled first, so non-standard home locations are
/// covered; the generic user-root patterns then catch paths under any
/// user's directory. Input with no recognized user-root segment is
/// returned unchanged, and the `<user>` placeholder itself is a fixed
/// point, so re-application cannot corrupt an already-sanitized path.
///
/// # Examples
///
/// ```
/// use oat_privacy::sanitize_path;
///
/// assert_eq!(sanitize_path("/Users/john/code/file.py"), "/Users/<user>/code/file.py");
/// assert_eq!(sanitize_path("/home/alice/app/main.py"), "/home/<user>/app/main.py");
/// assert_eq!(sanitize_path("relative/path/file.py"), "relative/path/file.py");
/// ```
pub fn sanitize_path(path: &str) -> String {
    let mut out = path.to_string();

    if let Some((home, replacement)) = env_home_replacement() {
        if out.contains(&home) {
            out = out.replace(&home, &replacement);
        }
    }

    out = RE_MACOS_USERS
        .replace_all(&out, format!("${{1}}{USER_PLACEHOLDER}"))
        .into_owned();
    out = RE_LINUX_HOME
        .replace_all(&out, format!("${{1}}{USER_PLACEHOLDER}"))
        .into_owned();
    out = RE_WINDOWS_USERS
        .replace_all(&out, format!("${{1}}{USER_PLACEHOLDER}"))
        .into_owned();
    out = RE_WINDOWS_USERS_ESCAPED
        .replace_all(&out, format!("${{1}}{USER_PLACEHOLDER}"))
        .into_owned();

    out
}

/// Check whether a string plausibly contains a sanitizable path: it needs
/// a separator and a recognized user-root marker. Used by the string
/// scrubber to skip the path pass on ordinary prose.
pub fn looks_path_like(value: &str) -> bool {
    if !value.contains('/') && !value.contains('\\') {
        return false;
    }
    if value.contains("/Users/") || value.contains("/home/") || value.contains(r"\Users\") {
        return true;
    }
    matches!(env_home_replacement(), Some((home, _)) if value.contains(&home))
}

/// The current user's home directory and its sanitized form, derived from
/// the environment. `None` when no usable home is reported or when the
/// reported value has no separable user segment.
fn env_home_replacement() -> Option<(String, String)> {
    let home = std::env::var("HOME")
        .ok()
        .filter(|v| !v.is_empty())
        .or_else(|| std::env::var("USERPROFILE").ok().filter(|v| !v.is_empty()))?;

    let trimmed = home.trim_end_matches(['/', '\\']);
    let split = trimmed.rfind(['/', '\\'])?;
    let (root, user) = trimmed.split_at(split);
    // `user` still carries its leading separator.
    if user.len() <= 1 || user[1..] == *USER_PLACEHOLDER {
        return None;
    }
    let sep = &user[..1];
    Some((trimmed.to_string(), format!("{root}{sep}{USER_PLACEHOLDER}")))
}
