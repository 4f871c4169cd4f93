//! The deletable file tree
//!
//! Folders hold either sub-folders or a flat list of files, never both.
//! Removing a file is permanent for the session.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

/// Why a removal was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemovalError {
    #[error("empty path")]
    EmptyPath,
    #[error("no such folder: {0}")]
    MissingFolder(String),
    #[error("not a file folder: {0}")]
    NotAFolder(String),
    #[error("no such file: {0}")]
    MissingFile(String),
    #[error("the system has collapsed; nothing is left to delete")]
    Sealed,
}

/// One node of the tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Node {
    Folder(BTreeMap<String, Node>),
    Files(Vec<String>),
}

impl Node {
    fn folder<const N: usize>(children: [(&str, Node); N]) -> Self {
        Node::Folder(
            children
                .into_iter()
                .map(|(name, node)| (name.to_string(), node))
                .collect(),
        )
    }

    fn files<const N: usize>(names: [&str; N]) -> Self {
        Node::Files(names.iter().map(|n| n.to_string()).collect())
    }

    fn count(&self) -> usize {
        match self {
            Node::Folder(children) => children.values().map(Node::count).sum(),
            Node::Files(files) => files.len(),
        }
    }

    fn collect_paths(&self, prefix: &str, out: &mut Vec<String>) {
        match self {
            Node::Folder(children) => {
                for (name, child) in children {
                    child.collect_paths(&format!("{prefix}{name}/"), out);
                }
            }
            Node::Files(files) => out.extend(files.iter().map(|f| format!("{prefix}{f}"))),
        }
    }
}

/// Virtual filesystem backing the file browser
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Vfs {
    root: Node,
}

impl Default for Vfs {
    fn default() -> Self {
        Self::initial()
    }
}

impl Vfs {
    /// The tree every session starts with
    pub fn initial() -> Self {
        let root = Node::folder([
            (
                "textures",
                Node::folder([
                    ("avatars", Node::files(["Player.png"])),
                    (
                        "props",
                        Node::folder([("beverages", Node::files(["CoffeeMug.png"]))]),
                    ),
                    (
                        "environment",
                        Node::folder([
                            ("backgrounds", Node::files(["Background.png"])),
                            (
                                "tiles",
                                Node::folder([
                                    ("grass", Node::files(["GrassTop.png", "GrassBody.png"])),
                                    ("wood", Node::files(["WoodTop.png", "WoodBody.png"])),
                                ]),
                            ),
                        ]),
                    ),
                ]),
            ),
            (
                "sounds",
                Node::folder([
                    ("sfx", Node::files(["Jump.wav"])),
                    ("music", Node::files(["ThemeSong.mp3"])),
                ]),
            ),
            (
                "ui",
                Node::folder([(
                    "overlays",
                    Node::folder([
                        ("start", Node::files(["StartButton.png"])),
                        ("pause", Node::files(["PauseMenu.png"])),
                    ]),
                )]),
            ),
            (
                "core",
                Node::folder([
                    ("subsystems", Node::files(["Physics.dll"])),
                    ("runtime", Node::files(["System.exe"])),
                    (
                        "security",
                        Node::files([
                            "reality_anchor.sys",
                            "quantum_stability.dat",
                            "consciousness_stream.bin",
                            "dream_fragments.mem",
                        ]),
                    ),
                ]),
            ),
            (
                "world",
                Node::folder([
                    ("barriers", Node::files(["ObsidianWall.asset"])),
                    ("fauna", Node::files(["Capybara.png", "Skelleton.anim"])),
                ]),
            ),
        ]);
        Self { root }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Number of files currently in the tree
    pub fn total_files(&self) -> usize {
        self.root.count()
    }

    /// Full paths of every remaining file, folders sorted by name
    pub fn paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.root.collect_paths("", &mut out);
        out
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths().iter().any(|p| p == path)
    }

    /// Remove one file by its slash-separated path
    pub fn remove(&mut self, path: &str) -> Result<(), RemovalError> {
        if path.is_empty() {
            return Err(RemovalError::EmptyPath);
        }
        let (folders, file_name) = match path.rsplit_once('/') {
            Some((folders, file)) => (Some(folders), file),
            None => (None, path),
        };

        let mut node = &mut self.root;
        for segment in folders.into_iter().flat_map(|f| f.split('/')) {
            node = match node {
                Node::Folder(children) => children
                    .get_mut(segment)
                    .ok_or_else(|| RemovalError::MissingFolder(path.to_string()))?,
                Node::Files(_) => return Err(RemovalError::NotAFolder(path.to_string())),
            };
        }

        let Node::Files(files) = node else {
            return Err(RemovalError::NotAFolder(path.to_string()));
        };
        let index = files
            .iter()
            .position(|f| f == file_name)
            .ok_or_else(|| RemovalError::MissingFile(path.to_string()))?;
        files.remove(index);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::consequence::{FINAL_SEALS, RESOURCE_TABLE};

    #[test]
    fn test_initial_tree_holds_every_resource() {
        let vfs = Vfs::initial();
        assert_eq!(vfs.total_files(), 20);
        for (id, _) in RESOURCE_TABLE {
            assert!(vfs.contains(id), "missing {id}");
        }
        assert!(vfs.contains("world/fauna/Skelleton.anim"));
    }

    #[test]
    fn test_remove_is_permanent() {
        let mut vfs = Vfs::initial();
        assert_eq!(vfs.remove(FINAL_SEALS[0]), Ok(()));
        assert!(!vfs.contains(FINAL_SEALS[0]));
        assert_eq!(vfs.total_files(), 19);
        assert_eq!(
            vfs.remove(FINAL_SEALS[0]),
            Err(RemovalError::MissingFile(FINAL_SEALS[0].to_string()))
        );
    }

    #[test]
    fn test_malformed_paths() {
        let mut vfs = Vfs::initial();
        assert_eq!(vfs.remove(""), Err(RemovalError::EmptyPath));
        assert!(matches!(
            vfs.remove("nowhere/file.png"),
            Err(RemovalError::MissingFolder(_))
        ));
        // A top-level name with no folder
        assert!(matches!(vfs.remove("textures"), Err(RemovalError::NotAFolder(_))));
        // Stops at a folder that holds folders
        assert!(matches!(
            vfs.remove("textures/Player.png"),
            Err(RemovalError::NotAFolder(_))
        ));
        // Walks through a file list
        assert!(matches!(
            vfs.remove("textures/avatars/Player.png/extra"),
            Err(RemovalError::NotAFolder(_))
        ));
        assert_eq!(vfs.total_files(), 20);
    }

    #[test]
    fn test_paths_are_sorted_by_folder() {
        let paths = Vfs::initial().paths();
        assert_eq!(paths.first().map(String::as_str), Some("core/runtime/System.exe"));
        assert_eq!(paths.len(), 20);
    }
}
