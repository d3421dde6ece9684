//! Extraction of the event name from a request path.

/// Returns the path segment that follows `prefix`, up to the next `/`.
///
/// `prefix` has the form `/<root>/`. Paths that do not start with it yield
/// `None`. A path equal to the prefix yields `Some("")`; segments after the
/// first are ignored, so `/team-events/gitPush/extra` yields `gitPush`.
#[must_use]
pub fn event_name_from_path<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = path.strip_prefix(prefix)?;
    Some(rest.split_once('/').map_or(rest, |(first, _)| first))
}

/// Builds the `/<root>/` prefix for a root name.
#[must_use]
pub fn url_prefix(url_name: &str) -> String {
    format!("/{url_name}/")
}
