use crate::utils::{dir_label, path_segments};
use colored::Colorize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::trace;

/// What a listed path is on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryKind {
    File,
    Executable,
    #[default]
    Directory,
    Missing,
}

impl EntryKind {
    pub fn of(path: &Path) -> Self {
        match std::fs::metadata(path) {
            Ok(metadata) if metadata.is_dir() => EntryKind::Directory,
            Ok(metadata) if metadata.is_file() => {
                if is_executable(&metadata) {
                    EntryKind::Executable
                } else {
                    EntryKind::File
                }
            }
            Ok(_) => EntryKind::File,
            Err(_) => EntryKind::Missing,
        }
    }

    pub fn is_file(self) -> bool {
        matches!(self, EntryKind::File | EntryKind::Executable)
    }
}

#[cfg(unix)]
fn is_executable(metadata: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_metadata: &std::fs::Metadata) -> bool {
    false
}

/// Represents a node in the file tree.
#[derive(Debug, Default)]
pub struct TreeNode {
    pub children: BTreeMap<String, TreeNode>,
    pub kind: EntryKind,
}

impl TreeNode {
    /// Children with directories first, then by name.
    pub fn sorted_children(&self) -> Vec<(&String, &TreeNode)> {
        let mut children: Vec<_> = self.children.iter().collect();
        children.sort_by(|(a_name, a), (b_name, b)| {
            (a.kind != EntryKind::Directory)
                .cmp(&(b.kind != EntryKind::Directory))
                .then_with(|| a_name.cmp(b_name))
        });
        children
    }
}

/// A nested view of a flat list of paths, rooted at their common directory.
#[derive(Debug)]
pub struct FileTree {
    root_label: String,
    root: TreeNode,
}

impl FileTree {
    /// Builds the tree for `files`, relative to `base`.
    ///
    /// `resolve` reports the kind of each listed path. Directories are only
    /// added as leaves when `include_dirs` is set; they still appear as
    /// parents of the files below them.
    pub fn build<F>(files: &[String], base: &Path, include_dirs: bool, resolve: F) -> Self
    where
        F: Fn(&str) -> EntryKind,
    {
        FileTree::build_from(files, base, include_dirs, resolve, true)
    }

    /// Like [`FileTree::build`], but rooted at `base` so every path keeps all
    /// of its segments.
    pub fn build_unrooted<F>(files: &[String], base: &Path, include_dirs: bool, resolve: F) -> Self
    where
        F: Fn(&str) -> EntryKind,
    {
        FileTree::build_from(files, base, include_dirs, resolve, false)
    }

    fn build_from<F>(
        files: &[String],
        base: &Path,
        include_dirs: bool,
        resolve: F,
        shared_root: bool,
    ) -> Self
    where
        F: Fn(&str) -> EntryKind,
    {
        let split: Vec<Vec<String>> = files.iter().map(|f| path_segments(f)).collect();
        let prefix = if shared_root {
            common_parent_prefix(&split)
        } else {
            Vec::new()
        };
        let root_label = if prefix.is_empty() {
            dir_label(base)
        } else {
            dir_label(&base.join(prefix.join("/")))
        };

        let mut root = TreeNode::default();
        for (file, segments) in files.iter().zip(&split) {
            let Some((leaf, parents)) = segments[prefix.len()..].split_last() else {
                continue;
            };
            let mut current = &mut root;
            for part in parents {
                current = current.children.entry(part.clone()).or_default();
            }
            let kind = resolve(file);
            if include_dirs || kind.is_file() {
                trace!("Adding {} to tree as {:?}", file, kind);
                current.children.entry(leaf.clone()).or_default().kind = kind;
            }
        }

        FileTree { root_label, root }
    }

    /// Builds the tree by looking paths up under `base` on disk.
    pub fn from_disk(files: &[String], base: &Path, include_dirs: bool) -> Self {
        FileTree::build(files, base, include_dirs, |file| EntryKind::of(&base.join(file)))
    }

    /// Full-path listing of `files` under `base`, resolved on disk.
    pub fn listing_from_disk(files: &[String], base: &Path, include_dirs: bool) -> Self {
        FileTree::build_unrooted(files, base, include_dirs, |file| {
            EntryKind::of(&base.join(file))
        })
    }

    pub fn root_label(&self) -> &str {
        &self.root_label
    }

    pub fn root(&self) -> &TreeNode {
        &self.root
    }

    /// Root label followed by the drawn branches.
    pub fn render(&self, use_color: bool) -> String {
        let mut lines = vec![colorize(&self.root_label, EntryKind::Directory, use_color)];
        render_node(&self.root, "", use_color, &mut lines);
        lines.join("\n")
    }

    /// Only the branches, uncolored.
    pub fn render_branches(&self) -> String {
        let mut lines = Vec::new();
        render_node(&self.root, "", false, &mut lines);
        lines.join("\n")
    }
}

/// Longest run of leading directories shared by every path's parent.
fn common_parent_prefix(split: &[Vec<String>]) -> Vec<String> {
    let mut parents = split
        .iter()
        .map(|segments| &segments[..segments.len().saturating_sub(1)]);
    let Some(first) = parents.next() else {
        return Vec::new();
    };
    let mut prefix: &[String] = first;
    for parent in parents {
        let shared = prefix
            .iter()
            .zip(parent)
            .take_while(|(a, b)| a == b)
            .count();
        prefix = &prefix[..shared];
    }
    prefix.to_vec()
}

fn colorize(name: &str, kind: EntryKind, use_color: bool) -> String {
    if !use_color {
        return name.to_owned();
    }
    match kind {
        EntryKind::Directory => name.blue().to_string(),
        EntryKind::Executable => name.green().to_string(),
        _ if name.starts_with('.') => name.yellow().to_string(),
        _ => name.to_owned(),
    }
}

fn render_node(node: &TreeNode, prefix: &str, use_color: bool, lines: &mut Vec<String>) {
    let children = node.sorted_children();
    let count = children.len();
    for (i, (name, child)) in children.into_iter().enumerate() {
        let is_last = i + 1 == count;
        let (branch, continuation) = if is_last {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };
        lines.push(format!(
            "{}{}{}",
            prefix,
            branch,
            colorize(name, child.kind, use_color)
        ));
        if child.kind == EntryKind::Directory {
            render_node(child, &format!("{}{}", prefix, continuation), use_color, lines);
        }
    }
}

/// Renders `files` under `base` as a tree; empty when there are no files.
pub fn get_tree_string(files: &[String], base: &Path, include_dirs: bool, use_color: bool) -> String {
    if files.is_empty() {
        return String::new();
    }
    FileTree::from_disk(files, base, include_dirs).render(use_color)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn common_prefix_uses_whole_segments() {
        let split = vec![strings(&["src", "app", "a.rs"]), strings(&["src", "applet", "b.rs"])];
        assert_eq!(common_parent_prefix(&split), strings(&["src"]));
    }

    #[test]
    fn single_file_roots_at_its_directory() {
        let split = vec![strings(&["a", "b.py"])];
        assert_eq!(common_parent_prefix(&split), strings(&["a"]));
    }
}
