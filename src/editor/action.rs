//! Editor actions and the line-based action script.
//!
//! Page buttons trigger actions by their `data-action` name
//! (`zoomIn`, `showComparison`, ...); scripts use short commands:
//!
//! ```text
//! # comment
//! add decision
//! connect n2 n5 "Yes"
//! label n5 "Fecal\nflotation"
//! move n5 120 400
//! select n3 n4
//! delete
//! zoom in
//! compare
//! ```

use crate::error::{Error, Result};
use crate::types::StyleTag;
use lazy_static::lazy_static;
use regex::Regex;
use std::str::FromStr;

lazy_static! {
    static ref RE_ADD: Regex = Regex::new(r"^add\s+(\S+)$").unwrap();
    static ref RE_SELECT: Regex = Regex::new(r"^select(?:\s+(.+))?$").unwrap();
    static ref RE_CONNECT: Regex =
        Regex::new(r#"^connect\s+(\S+)\s+(\S+)(?:\s+"((?:[^"\\]|\\.)*)")?$"#).unwrap();
    static ref RE_LABEL: Regex = Regex::new(r#"^label\s+(\S+)\s+"((?:[^"\\]|\\.)*)"$"#).unwrap();
    static ref RE_MOVE: Regex =
        Regex::new(r"^move\s+(\S+)\s+(-?\d+(?:\.\d+)?)\s+(-?\d+(?:\.\d+)?)$").unwrap();
    static ref RE_ZOOM: Regex = Regex::new(r"^zoom\s+(in|out)$").unwrap();
    static ref RE_DOWNLOAD: Regex = Regex::new(r"^download\s+(learner|reference)$").unwrap();
}

/// Something the user asked the editor to do
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    AddNode(StyleTag),
    DeleteSelected,
    ResetTemplate,
    ClearDiagram,
    ZoomIn,
    ZoomOut,
    FitWindow,
    ShowComparison,
    DownloadLearner,
    DownloadReference,
    Select(Vec<String>),
    Connect {
        source: String,
        target: String,
        label: Option<String>,
    },
    SetLabel {
        id: String,
        label: String,
    },
    Move {
        id: String,
        x: f64,
        y: f64,
    },
}

impl FromStr for Action {
    type Err = Error;

    /// Parse a `data-action` button name
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "resetTemplate" => Ok(Action::ResetTemplate),
            "clearDiagram" => Ok(Action::ClearDiagram),
            "zoomIn" => Ok(Action::ZoomIn),
            "zoomOut" => Ok(Action::ZoomOut),
            "fitWindow" => Ok(Action::FitWindow),
            "deleteSelected" => Ok(Action::DeleteSelected),
            "showComparison" => Ok(Action::ShowComparison),
            "downloadMyDiagram" => Ok(Action::DownloadLearner),
            "downloadExpertDiagram" => Ok(Action::DownloadReference),
            other => Err(Error::UnknownAction(other.to_string())),
        }
    }
}

/// Parse an action script. Errors carry the 1-based line number.
pub fn parse_script(script: &str) -> Result<Vec<Action>> {
    let mut actions = Vec::new();

    for (idx, raw) in script.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let action = parse_line(line).map_err(|message| Error::Script {
            line: idx + 1,
            message,
        })?;
        actions.push(action);
    }

    Ok(actions)
}

fn parse_line(line: &str) -> std::result::Result<Action, String> {
    match line {
        "delete" => return Ok(Action::DeleteSelected),
        "reset" => return Ok(Action::ResetTemplate),
        "clear" => return Ok(Action::ClearDiagram),
        "fit" => return Ok(Action::FitWindow),
        "compare" => return Ok(Action::ShowComparison),
        _ => {}
    }

    if let Some(caps) = RE_ADD.captures(line) {
        return caps[1]
            .parse::<StyleTag>()
            .map(Action::AddNode)
            .map_err(|_| format!("unknown element type '{}'", &caps[1]));
    }

    if let Some(caps) = RE_SELECT.captures(line) {
        let ids = caps
            .get(1)
            .map(|m| m.as_str().split_whitespace().map(String::from).collect())
            .unwrap_or_default();
        return Ok(Action::Select(ids));
    }

    if let Some(caps) = RE_CONNECT.captures(line) {
        return Ok(Action::Connect {
            source: caps[1].to_string(),
            target: caps[2].to_string(),
            label: caps.get(3).map(|m| unescape(m.as_str())),
        });
    }

    if let Some(caps) = RE_LABEL.captures(line) {
        return Ok(Action::SetLabel {
            id: caps[1].to_string(),
            label: unescape(&caps[2]),
        });
    }

    if let Some(caps) = RE_MOVE.captures(line) {
        let coord = |s: &str| {
            s.parse::<f64>()
                .map_err(|e| format!("invalid coordinate '{}': {}", s, e))
        };
        return Ok(Action::Move {
            id: caps[1].to_string(),
            x: coord(&caps[2])?,
            y: coord(&caps[3])?,
        });
    }

    if let Some(caps) = RE_ZOOM.captures(line) {
        return Ok(if &caps[1] == "in" {
            Action::ZoomIn
        } else {
            Action::ZoomOut
        });
    }

    if let Some(caps) = RE_DOWNLOAD.captures(line) {
        return Ok(if &caps[1] == "learner" {
            Action::DownloadLearner
        } else {
            Action::DownloadReference
        });
    }

    line.parse::<Action>()
        .map_err(|_| format!("unrecognized command '{}'", line))
}

/// Resolve `\n`, `\"` and `\\` escapes of a quoted script string
fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_action_names() {
        assert_eq!("zoomIn".parse::<Action>().unwrap(), Action::ZoomIn);
        assert_eq!(
            "downloadExpertDiagram".parse::<Action>().unwrap(),
            Action::DownloadReference
        );
        assert!(matches!(
            "nextTab".parse::<Action>(),
            Err(Error::UnknownAction(name)) if name == "nextTab"
        ));
    }

    #[test]
    fn test_parse_script() {
        let script = r#"
# build a branch
add Decision
connect n2 n5 "Yes"
label n5 "Fecal\nflotation"
move n5 -10 42.5
select n3 n4
delete
zoom out
showComparison
"#;
        let actions = parse_script(script).unwrap();
        assert_eq!(
            actions,
            vec![
                Action::AddNode(StyleTag::Decision),
                Action::Connect {
                    source: "n2".to_string(),
                    target: "n5".to_string(),
                    label: Some("Yes".to_string()),
                },
                Action::SetLabel {
                    id: "n5".to_string(),
                    label: "Fecal\nflotation".to_string(),
                },
                Action::Move {
                    id: "n5".to_string(),
                    x: -10.0,
                    y: 42.5,
                },
                Action::Select(vec!["n3".to_string(), "n4".to_string()]),
                Action::DeleteSelected,
                Action::ZoomOut,
                Action::ShowComparison,
            ]
        );
    }

    #[test]
    fn test_connect_without_label_and_empty_select() {
        assert_eq!(
            parse_script("connect a b\nselect").unwrap(),
            vec![
                Action::Connect {
                    source: "a".to_string(),
                    target: "b".to_string(),
                    label: None,
                },
                Action::Select(Vec::new()),
            ]
        );
    }

    #[test]
    fn test_script_error_line_number() {
        let err = parse_script("add outcome\n\nadd rectangle\n").unwrap_err();
        match err {
            Error::Script { line, message } => {
                assert_eq!(line, 3);
                assert!(message.contains("rectangle"));
            }
            other => panic!("expected script error, got {:?}", other),
        }
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r#"say \"hi\"\\"#), r#"say "hi"\"#);
    }
}
