//! Operator configuration for history entries.
//!
//! Order history records who made each change. Discord user ids can be mapped
//! to friendly labels with `OPERATOR_NICKNAMES=id:label,id:label` in `.env`;
//! unmapped users fall back to their Discord username.

use std::collections::HashMap;

/// Parses `id:label` pairs separated by commas. Malformed pairs are skipped.
#[must_use]
pub fn parse_nicknames(raw: &str) -> HashMap<String, String> {
    raw.split(',')
        .filter_map(|pair| {
            let (id, label) = pair.split_once(':')?;
            let (id, label) = (id.trim(), label.trim());
            (!id.is_empty() && !label.is_empty()).then(|| (id.to_string(), label.to_string()))
        })
        .collect()
}

/// Gets the configured mapping of user ids to operator labels.
#[must_use]
pub fn get_operator_nicknames() -> HashMap<String, String> {
    std::env::var("OPERATOR_NICKNAMES")
        .map(|raw| parse_nicknames(&raw))
        .unwrap_or_default()
}

/// Label to record for `user_id`, falling back to `username`.
#[must_use]
pub fn operator_label(nicknames: &HashMap<String, String>, user_id: &str, username: &str) -> String {
    nicknames
        .get(user_id)
        .cloned()
        .unwrap_or_else(|| username.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nicknames() {
        let map = parse_nicknames("123:Front desk, 456 : Bench tech,broken,:x,789:");
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("123").map(String::as_str), Some("Front desk"));
        assert_eq!(map.get("456").map(String::as_str), Some("Bench tech"));
    }

    #[test]
    fn test_operator_label_falls_back_to_username() {
        let map = parse_nicknames("123:Front desk");
        assert_eq!(operator_label(&map, "123", "ana"), "Front desk");
        assert_eq!(operator_label(&map, "999", "bruno"), "bruno");
    }
}
