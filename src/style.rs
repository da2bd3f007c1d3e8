//! Cell style strings of the form `name;key=value;key=value`.
//!
//! The live graph stores a node's visual configuration as one of these
//! strings. The leading entry without `=` names a stylesheet entry
//! (`decision-node`), the remaining entries override individual keys.

use std::fmt;

/// Keys written by [`normalize_label_style`], in the order they are applied.
pub const LABEL_CENTERING: &[(&str, &str)] = &[
    ("labelPosition", "center"),
    ("verticalLabelPosition", "middle"),
    ("align", "center"),
    ("verticalAlign", "middle"),
    ("whiteSpace", "wrap"),
    ("overflow", "hidden"),
    ("spacing", "8"),
];

/// A parsed cell style.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellStyle {
    name: Option<String>,
    entries: Vec<(String, String)>,
}

impl CellStyle {
    pub fn parse(style: &str) -> Self {
        let mut parsed = CellStyle::default();

        for part in style.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            match part.split_once('=') {
                Some((key, value)) => {
                    parsed.set(key.trim(), value.trim());
                }
                None => {
                    // Only the first bare entry names the style
                    if parsed.name.is_none() {
                        parsed.name = Some(part.to_string());
                    }
                }
            }
        }

        parsed
    }

    /// The stylesheet entry this style derives from, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set `key` to `value`, replacing an existing entry in place.
    pub fn set(&mut self, key: &str, value: &str) -> &mut Self {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.entries.push((key.to_string(), value.to_string())),
        }
        self
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for CellStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::with_capacity(self.entries.len() + 1);
        if let Some(name) = &self.name {
            parts.push(name.clone());
        }
        for (key, value) in &self.entries {
            parts.push(format!("{}={}", key, value));
        }
        write!(f, "{}", parts.join(";"))
    }
}

/// Return `style` with its label centered and wrapped inside the shape.
pub fn normalize_label_style(style: &str) -> String {
    let mut parsed = CellStyle::parse(style);
    for (key, value) in LABEL_CENTERING {
        parsed.set(key, value);
    }
    parsed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_name_and_entries() {
        let style = CellStyle::parse("decision-node;align=left;spacing=4");
        assert_eq!(style.name(), Some("decision-node"));
        assert_eq!(style.get("align"), Some("left"));
        assert_eq!(style.get("spacing"), Some("4"));
        assert_eq!(style.get("missing"), None);
    }

    #[test]
    fn test_parse_without_name() {
        let style = CellStyle::parse("edgeStyle=orthogonalEdgeStyle");
        assert_eq!(style.name(), None);
        assert_eq!(style.get("edgeStyle"), Some("orthogonalEdgeStyle"));
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut style = CellStyle::parse("pathway-node;align=left;overflow=visible");
        style.set("align", "center");
        assert_eq!(style.to_string(), "pathway-node;align=center;overflow=visible");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize_label_style("outcome-node");
        let twice = normalize_label_style(&once);
        assert_eq!(once, twice);
        assert!(once.starts_with("outcome-node;labelPosition=center"));
        assert!(once.ends_with("spacing=8"));
    }

    #[test]
    fn test_empty_style() {
        let style = CellStyle::parse("");
        assert_eq!(style.name(), None);
        assert_eq!(style.to_string(), "");
    }
}
