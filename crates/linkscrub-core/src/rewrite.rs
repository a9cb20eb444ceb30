//! Substring substitution of cleaned URLs back into message text.

/// Replaces every occurrence of each changed original URL with its cleaned
/// form, longest original first so a URL that is a prefix of another
/// cannot corrupt the longer occurrence. Everything around the URLs is
/// preserved verbatim.
///
/// Returns `None` when no replacement changed the text; callers use that
/// to suppress redelivery entirely.
pub fn rewrite(text: &str, replacements: &[(String, String)]) -> Option<String> {
    let mut changed: Vec<&(String, String)> = replacements
        .iter()
        .filter(|(original, cleaned)| original != cleaned)
        .collect();
    if changed.is_empty() {
        return None;
    }

    // Stable sort: equal lengths keep caller order.
    changed.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

    let mut out = text.to_string();
    let mut modified = false;
    for (original, cleaned) in changed {
        if out.contains(original.as_str()) {
            out = out.replace(original.as_str(), cleaned);
            modified = true;
        }
    }

    if modified {
        Some(out)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(list: &[(&str, &str)]) -> Vec<(String, String)> {
        list.iter()
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .collect()
    }

    #[test]
    fn replaces_all_occurrences() {
        let out = rewrite(
            "see https://a.com/x?utm_source=1 and https://a.com/x?utm_source=1 again",
            &pairs(&[("https://a.com/x?utm_source=1", "https://a.com/x")]),
        )
        .unwrap();
        assert_eq!(out, "see https://a.com/x and https://a.com/x again");
    }

    #[test]
    fn longest_original_first_avoids_prefix_corruption() {
        // The shorter URL is a strict prefix of the longer one.
        let out = rewrite(
            "short https://a.io/x?t=1 long https://a.io/x?t=1&utm_source=2",
            &pairs(&[
                ("https://a.io/x?t=1", "https://b.io/x?t=1"),
                ("https://a.io/x?t=1&utm_source=2", "https://b.io/x?t=1"),
            ]),
        )
        .unwrap();
        assert_eq!(out, "short https://b.io/x?t=1 long https://b.io/x?t=1");
    }

    #[test]
    fn unchanged_pairs_are_a_noop() {
        assert_eq!(
            rewrite(
                "nothing to do https://a.com/x",
                &pairs(&[("https://a.com/x", "https://a.com/x")]),
            ),
            None
        );
        assert_eq!(rewrite("no urls at all", &[]), None);
    }

    #[test]
    fn originals_absent_from_text_do_not_count_as_modification() {
        assert_eq!(
            rewrite(
                "plain text",
                &pairs(&[("https://gone.example.com/", "https://else.example.com/")]),
            ),
            None
        );
    }

    #[test]
    fn surrounding_text_is_untouched() {
        let out = rewrite(
            "prefix (https://a.com/?utm_source=x) suffix",
            &pairs(&[("https://a.com/?utm_source=x", "https://a.com/")]),
        )
        .unwrap();
        assert_eq!(out, "prefix (https://a.com/) suffix");
    }
}
