//! Sanitize server-supplied display strings before they reach the webview.
//!
//! The backend returns disease names and descriptions as free text that the
//! frontend renders. Markup is stripped here so a compromised or buggy
//! backend cannot inject live HTML into the client.

/// Strip markup from a display string: tags removed, entities left alone,
/// whitespace collapsed. The result is safe to hand to the webview as text.
pub fn display_text(raw: &str) -> String {
    let no_tags = strip_tags(raw);
    let no_uris = strip_script_uris(&no_tags);
    collapse_whitespace(&no_uris)
}

/// Remove every `<...>` span. Unterminated tags are dropped to the end of
/// the string rather than passed through.
fn strip_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for c in text.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

/// Remove script-scheme words that survive tag stripping inside
/// attribute-less text.
fn strip_script_uris(text: &str) -> String {
    let lower = text.to_ascii_lowercase();
    let mut out = text.to_string();
    for scheme in ["javascript:", "vbscript:"] {
        if lower.contains(scheme) {
            out = out
                .split_whitespace()
                .filter(|word| !word.to_ascii_lowercase().starts_with(scheme))
                .collect::<Vec<_>>()
                .join(" ");
        }
    }
    out
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_unchanged() {
        assert_eq!(display_text("Bronchial Asthma"), "Bronchial Asthma");
    }

    #[test]
    fn tags_are_stripped() {
        assert_eq!(display_text("<b>Asthma</b>"), "Asthma");
        assert_eq!(
            display_text("<script>alert(1)</script>Diabetes"),
            "alert(1)Diabetes"
        );
    }

    #[test]
    fn event_handlers_do_not_survive() {
        let input = "<img src=x onerror=alert(1)>Migraine";
        assert_eq!(display_text(input), "Migraine");
    }

    #[test]
    fn unterminated_tag_dropped() {
        assert_eq!(display_text("Jaundice <span class="), "Jaundice");
    }

    #[test]
    fn script_uris_removed() {
        assert_eq!(display_text("javascript:alert(1) Typhoid"), "Typhoid");
    }

    #[test]
    fn whitespace_collapsed() {
        assert_eq!(display_text("  Common   Cold \n"), "Common Cold");
    }
}
