//! Metric-name substitution for quadrant templates.
//!
//! Templates reference metrics by their bare API name, e.g.
//! `"CONTACTS_IN_QUEUE >= 10"`. Substitution replaces each whole-token
//! occurrence of a known name with the metric value. Names are matched
//! longest first and the input is scanned once, so a name that is a prefix
//! of another (`AGENTS_ON` / `AGENTS_ONLINE`) never captures part of it, and
//! substituted text is never rescanned.

use std::collections::BTreeMap;

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Format a metric value the way it appears in rendered text.
///
/// Integral values print without a fractional part (`7`, not `7.0`).
pub fn format_value(value: f64) -> String {
    format!("{}", value)
}

/// Replace every whole-token metric name in `template` with its value.
///
/// ```
/// use std::collections::BTreeMap;
/// use connect_wallboard::data::template::substitute;
///
/// let mut values = BTreeMap::new();
/// values.insert("CONTACTS_IN_QUEUE".to_string(), 7.0);
/// assert_eq!(substitute("CONTACTS_IN_QUEUE<10", &values), "7<10");
/// ```
pub fn substitute(template: &str, values: &BTreeMap<String, f64>) -> String {
    if template.is_empty() || values.is_empty() {
        return template.to_string();
    }

    let mut names: Vec<(&str, String)> = values
        .iter()
        .filter(|(name, _)| !name.is_empty())
        .map(|(name, value)| (name.as_str(), format_value(*value)))
        .collect();
    // Longest first; ties broken by name for a deterministic order.
    names.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(b.0)));

    let bytes = template.as_bytes();
    let mut out = String::with_capacity(template.len());
    let mut i = 0;
    let mut copied_to = 0;

    while i < bytes.len() {
        let at_boundary = i == 0 || !is_ident_byte(bytes[i - 1]);
        if at_boundary && is_ident_byte(bytes[i]) {
            let matched = names.iter().find(|(name, _)| {
                let end = i + name.len();
                template[i..].starts_with(name)
                    && (end == bytes.len() || !is_ident_byte(bytes[end]))
            });
            if let Some((name, value)) = matched {
                out.push_str(&template[copied_to..i]);
                out.push_str(value);
                i += name.len();
                copied_to = i;
                continue;
            }
        }
        i += 1;
    }

    out.push_str(&template[copied_to..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(7.0), "7");
        assert_eq!(format_value(0.75), "0.75");
        assert_eq!(format_value(2.0), "2");
        assert_eq!(format_value(-1.5), "-1.5");
    }

    #[test]
    fn test_replaces_every_occurrence() {
        let v = values(&[("CONTACTS_IN_QUEUE", 7.0)]);
        assert_eq!(
            substitute("CONTACTS_IN_QUEUE>=5 && CONTACTS_IN_QUEUE<10", &v),
            "7>=5 && 7<10"
        );
    }

    #[test]
    fn test_longest_name_wins() {
        let v = values(&[("AGENTS_ON", 1.0), ("AGENTS_ONLINE", 12.0)]);
        assert_eq!(substitute("AGENTS_ONLINE - AGENTS_ON", &v), "12 - 1");
    }

    #[test]
    fn test_only_whole_tokens() {
        let v = values(&[("SLOTS", 3.0)]);
        assert_eq!(substitute("SLOTS_ACTIVE + SLOTS", &v), "SLOTS_ACTIVE + 3");
        assert_eq!(substitute("XSLOTS", &v), "XSLOTS");
    }

    #[test]
    fn test_plain_text_preserved() {
        let v = values(&[("AGENTS_AVAILABLE", 4.0)]);
        assert_eq!(
            substitute("Agents available: AGENTS_AVAILABLE.", &v),
            "Agents available: 4."
        );
        assert_eq!(substitute("", &v), "");
        assert_eq!(substitute("no metrics here", &BTreeMap::new()), "no metrics here");
    }

    #[test]
    fn test_unknown_names_left_alone() {
        let v = values(&[("AGENTS_ERROR", 0.0)]);
        assert_eq!(substitute("AGENTS_STAFFED > AGENTS_ERROR", &v), "AGENTS_STAFFED > 0");
    }

    #[test]
    fn test_non_ascii_text() {
        let v = values(&[("CONTACTS_IN_QUEUE", 2.0)]);
        assert_eq!(substitute("→ CONTACTS_IN_QUEUE ←", &v), "→ 2 ←");
    }
}
