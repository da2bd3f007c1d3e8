//! Mount points provided by the host page.

use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::fmt;

/// Named mount points the editor renders into
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MountRole {
    GraphContainer,
    LearnerDiagram,
    ReferenceDiagram,
    Messages,
}

impl MountRole {
    pub const ALL: [MountRole; 4] = [
        MountRole::GraphContainer,
        MountRole::LearnerDiagram,
        MountRole::ReferenceDiagram,
        MountRole::Messages,
    ];

    /// `data-role` attribute value of the mount point
    pub fn as_str(&self) -> &'static str {
        match self {
            MountRole::GraphContainer => "graph-container",
            MountRole::LearnerDiagram => "student-diagram",
            MountRole::ReferenceDiagram => "expert-diagram",
            MountRole::Messages => "messages",
        }
    }
}

impl fmt::Display for MountRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The page the editor is embedded in
pub trait HostPage {
    fn has_mount(&self, role: MountRole) -> bool;

    /// Size of a mount point in px, `None` if it is absent
    fn container_size(&self, role: MountRole) -> Option<(f64, f64)>;

    /// Replace the content of a mount point.
    ///
    /// Fails with [`Error::MissingTarget`] if the page has no such mount.
    fn mount(&mut self, role: MountRole, content: String) -> Result<()>;
}

#[derive(Debug, Clone, Default)]
struct Mount {
    size: (f64, f64),
    content: String,
}

/// Host page that keeps mounted content in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    mounts: BTreeMap<MountRole, Mount>,
}

impl MemoryHost {
    /// A page without any mount points
    pub fn new() -> Self {
        Self::default()
    }

    /// A page with every mount point, the graph container sized `width × height`
    pub fn full(width: f64, height: f64) -> Self {
        MountRole::ALL
            .into_iter()
            .fold(Self::new(), |host, role| host.with_mount(role, width, height))
    }

    pub fn with_mount(mut self, role: MountRole, width: f64, height: f64) -> Self {
        self.mounts.insert(
            role,
            Mount {
                size: (width, height),
                content: String::new(),
            },
        );
        self
    }

    pub fn without_mount(mut self, role: MountRole) -> Self {
        self.mounts.remove(&role);
        self
    }

    pub fn content(&self, role: MountRole) -> Option<&str> {
        self.mounts.get(&role).map(|m| m.content.as_str())
    }
}

impl HostPage for MemoryHost {
    fn has_mount(&self, role: MountRole) -> bool {
        self.mounts.contains_key(&role)
    }

    fn container_size(&self, role: MountRole) -> Option<(f64, f64)> {
        self.mounts.get(&role).map(|m| m.size)
    }

    fn mount(&mut self, role: MountRole, content: String) -> Result<()> {
        let mount = self
            .mounts
            .get_mut(&role)
            .ok_or(Error::MissingTarget(role))?;
        mount.content = content;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mount_and_read_back() {
        let mut host = MemoryHost::full(800.0, 600.0);
        host.mount(MountRole::Messages, "hello".to_string()).unwrap();
        assert_eq!(host.content(MountRole::Messages), Some("hello"));
        assert_eq!(host.container_size(MountRole::GraphContainer), Some((800.0, 600.0)));
    }

    #[test]
    fn test_missing_mount() {
        let mut host = MemoryHost::full(800.0, 600.0).without_mount(MountRole::LearnerDiagram);
        let err = host
            .mount(MountRole::LearnerDiagram, String::new())
            .unwrap_err();
        assert!(matches!(err, Error::MissingTarget(MountRole::LearnerDiagram)));
        assert!(!host.has_mount(MountRole::LearnerDiagram));
    }
}
