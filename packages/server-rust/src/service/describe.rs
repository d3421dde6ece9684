//! HTML documentation of the registered events.

use std::fmt::Write as _;

use super::registry::EventRegistry;

/// Page template served at `GET /<root>/`.
///
/// Placeholders: `{url_name}`, `{event_rows}`, `{root_url}`.
pub const INDEX_TEMPLATE: &str = include_str!("../../templates/team_events.html");

/// Renders one `<tr>` per registered event, in registry order.
///
/// Each row holds the event name, its endpoint path and the HTML-escaped
/// sample payload inside `<pre>`.
#[must_use]
pub fn describe_events(registry: &EventRegistry, url_name: &str) -> String {
    let mut rows = String::new();
    for entry in registry.iter() {
        let name = entry.name();
        let sample = escape_html(entry.factory().sample_request_payload());
        // Writing to a String cannot fail.
        let _ = write!(
            rows,
            "<tr>\n\
             <td valign='top'>{name}</td>\n\
             <td valign='top'>/{url_name}/{name}</td>\n\
             <td><pre>{sample}</pre></td>\n\
             </tr>\n"
        );
    }
    rows
}

/// Escapes `&`, `<`, `>`, `"` and `'` for use in HTML text and attributes.
#[must_use]
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Fills the page template.
///
/// Placeholders are substituted in a single pass, so placeholder text that
/// appears inside `event_rows` is left as is.
#[must_use]
pub fn render_index(template: &str, url_name: &str, event_rows: &str, root_url: &str) -> String {
    const PLACEHOLDERS: [&str; 3] = ["{url_name}", "{event_rows}", "{root_url}"];

    let mut out = String::with_capacity(template.len() + event_rows.len());
    let mut rest = template;
    while let Some((at, placeholder)) = PLACEHOLDERS
        .iter()
        .filter_map(|p| rest.find(p).map(|at| (at, *p)))
        .min_by_key(|(at, _)| *at)
    {
        out.push_str(&rest[..at]);
        out.push_str(match placeholder {
            "{url_name}" => url_name,
            "{event_rows}" => event_rows,
            _ => root_url,
        });
        rest = &rest[at + placeholder.len()..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use proptest::prelude::*;
    use team_events_core::{event_names, samples};

    use super::*;
    use crate::events::testing::RecordingScheduler;
    use crate::events::PingHookEventFactory;
    use crate::service::registry::default_registry;

    fn registry() -> EventRegistry {
        default_registry(Arc::new(RecordingScheduler::default()))
    }

    #[test]
    fn single_event_row_layout() {
        let registry = EventRegistry::builder()
            .register(event_names::PING, PingHookEventFactory)
            .build();

        let rows = describe_events(&registry, "team-events");

        let expected = format!(
            "<tr>\n\
             <td valign='top'>ping</td>\n\
             <td valign='top'>/team-events/ping</td>\n\
             <td><pre>{}</pre></td>\n\
             </tr>\n",
            escape_html(samples::PING)
        );
        assert_eq!(rows, expected);
        assert!(rows.contains("&quot;message&quot;: &quot;Hello, world!&quot;"));
    }

    #[test]
    fn rows_follow_registry_order() {
        let registry = registry();
        let rows = describe_events(&registry, "team-events");

        let positions: Vec<usize> = registry
            .iter()
            .map(|entry| {
                rows.find(&format!("<td valign='top'>{}</td>", entry.name()))
                    .unwrap()
            })
            .collect();
        assert_eq!(positions.len(), 4);
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(rows.matches("<tr>").count(), 4);
    }

    #[test]
    fn samples_are_escaped() {
        let rows = describe_events(&registry(), "team-events");

        assert!(samples::GIT_CODE_PUSHED.contains("<a href="));
        assert!(!rows.contains("<a href="));
        assert!(rows.contains("&lt;a href="));
        assert!(rows.contains(" &amp; "));
    }

    #[test]
    fn empty_registry_renders_nothing() {
        let registry = EventRegistry::builder().build();
        assert_eq!(describe_events(&registry, "team-events"), "");
    }

    #[test]
    fn rendering_is_idempotent() {
        let registry = registry();
        assert_eq!(
            describe_events(&registry, "team-events"),
            describe_events(&registry, "team-events")
        );
    }

    #[test]
    fn escapes_every_special_character() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn render_index_fills_placeholders() {
        let page = render_index(
            "<h1>{url_name}</h1><table>{event_rows}</table><a href='{root_url}'>",
            "team-events",
            "<tr></tr>",
            "http://localhost:8080/",
        );
        assert_eq!(
            page,
            "<h1>team-events</h1><table><tr></tr></table><a href='http://localhost:8080/'>"
        );
    }

    #[test]
    fn render_index_does_not_expand_inside_rows() {
        let page = render_index("{event_rows}|{root_url}", "x", "{root_url}", "R");
        assert_eq!(page, "{root_url}|R");
    }

    #[test]
    fn bundled_template_has_every_placeholder() {
        for placeholder in ["{url_name}", "{event_rows}", "{root_url}"] {
            assert!(INDEX_TEMPLATE.contains(placeholder), "{placeholder}");
        }
    }

    proptest! {
        #[test]
        fn escaped_text_has_no_raw_markup(raw in ".{0,64}") {
            let escaped = escape_html(&raw);
            prop_assert!(!escaped.contains('<'));
            prop_assert!(!escaped.contains('>'));
            prop_assert!(!escaped.contains('"'));
            prop_assert!(!escaped.contains('\''));
        }
    }
}
