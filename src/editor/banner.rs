//! Transient message banner.

use crate::svg::escape_xml;
use std::time::{Duration, Instant};

/// How long a banner stays visible
pub const BANNER_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
    Info,
}

impl MessageKind {
    pub fn css_class(&self) -> &'static str {
        match self {
            MessageKind::Success => "success",
            MessageKind::Error => "error",
            MessageKind::Info => "info",
        }
    }

    pub fn heading(&self) -> &'static str {
        match self {
            MessageKind::Success => "Success!",
            MessageKind::Error => "Error!",
            MessageKind::Info => "Info:",
        }
    }
}

/// A message shown to the user until it expires
#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    pub kind: MessageKind,
    pub text: String,
    pub shown_at: Instant,
}

impl Banner {
    pub fn new(kind: MessageKind, text: impl Into<String>, shown_at: Instant) -> Self {
        Self {
            kind,
            text: text.into(),
            shown_at,
        }
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) < BANNER_TTL
    }

    pub fn to_html(&self) -> String {
        format!(
            r#"<div class="message {}"><strong>{}</strong> {}</div>"#,
            self.kind.css_class(),
            self.kind.heading(),
            escape_xml(&self.text)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry() {
        let start = Instant::now();
        let banner = Banner::new(MessageKind::Info, "hi", start);
        assert!(banner.is_visible(start));
        assert!(banner.is_visible(start + Duration::from_millis(4999)));
        assert!(!banner.is_visible(start + BANNER_TTL));
    }

    #[test]
    fn test_html() {
        let banner = Banner::new(MessageKind::Error, "a < b", Instant::now());
        assert_eq!(
            banner.to_html(),
            r#"<div class="message error"><strong>Error!</strong> a &lt; b</div>"#
        );
    }
}
