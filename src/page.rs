//! Standalone comparison page - the learner render next to the reference.

use crate::editor::{MemoryHost, MountRole};
use crate::svg::escape_xml;

/// Default page title
pub const PAGE_TITLE: &str = "Diarrhea Management Decision Map - Comparison";

/// Contents of the panels that make up the comparison page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComparisonPage {
    pub title: String,
    pub learner: String,
    pub reference: String,
    pub messages: String,
}

impl ComparisonPage {
    /// Collect whatever the editor mounted into a memory host
    pub fn from_host(host: &MemoryHost) -> Self {
        let content = |role| host.content(role).unwrap_or_default().to_string();
        Self {
            title: PAGE_TITLE.to_string(),
            learner: content(MountRole::LearnerDiagram),
            reference: content(MountRole::ReferenceDiagram),
            messages: content(MountRole::Messages),
        }
    }

    pub fn to_html(&self) -> String {
        format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{title}</title>
    <style>
        body {{ font-family: "Open Sans", Arial, sans-serif; margin: 0 auto; padding: 20px; max-width: 1200px; color: #333; }}
        .comparison {{ display: flex; gap: 20px; }}
        .panel {{ flex: 1; border: 1px solid #ddd; border-radius: 8px; padding: 10px; }}
        .panel h2 {{ font-size: 1.1em; color: #017DFA; margin: 0 0 10px 0; }}
        .message {{ padding: 10px 15px; border-radius: 4px; margin-bottom: 15px; }}
        .message.success {{ background: #e8f5e9; color: #2e7d32; }}
        .message.error {{ background: #ffebee; color: #c62828; }}
        .message.info {{ background: #e3f2fd; color: #1565c0; }}
    </style>
</head>
<body>
    <div data-role="{messages_role}">{messages}</div>
    <div class="comparison">
        <div class="panel">
            <h2>Your Diagram</h2>
            <div data-role="{learner_role}">{learner}</div>
        </div>
        <div class="panel">
            <h2>Expert Reference</h2>
            <div data-role="{reference_role}">{reference}</div>
        </div>
    </div>
</body>
</html>
"#,
            title = escape_xml(&self.title),
            messages_role = MountRole::Messages,
            messages = self.messages,
            learner_role = MountRole::LearnerDiagram,
            learner = self.learner,
            reference_role = MountRole::ReferenceDiagram,
            reference = self.reference,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::HostPage;

    #[test]
    fn test_page_from_host() {
        let mut host = MemoryHost::full(800.0, 600.0);
        host.mount(MountRole::LearnerDiagram, "<svg></svg>".to_string())
            .unwrap();

        let page = ComparisonPage::from_host(&host);
        assert_eq!(page.learner, "<svg></svg>");
        assert!(page.reference.is_empty());

        let html = page.to_html();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<div data-role="student-diagram"><svg></svg></div>"#));
        assert!(html.contains("Diarrhea Management Decision Map - Comparison"));
    }

    #[test]
    fn test_page_without_mounts() {
        let page = ComparisonPage::from_host(&MemoryHost::new());
        assert_eq!(page.learner, "");
        assert!(page.to_html().contains(r#"<div data-role="messages"></div>"#));
    }
}
