// Copyright (c) 2016-2017 Martijn Rijkeboer <mrr@sru-systems.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A group in the tree and the navigable handle onto it.

use super::database::Database;
use super::entry::EntryRef;
use super::path;

/// The data carried by a group: a folder-like node in the tree.
#[derive(Clone, Debug, PartialEq)]
pub struct Group {
    /// This group's identifier.
    pub uuid: String,

    /// The name of this group.
    pub name: String,

    /// The notes of this group.
    pub notes: String,
}

/// A group's node inside the database's arena: the group's data plus its
/// weak links to its parent and children.
#[derive(Clone, Debug)]
pub(crate) struct GroupNode {
    pub group: Group,
    pub parent: Option<usize>,
    pub path: String,
    pub groups: Vec<usize>,
    pub entries: Vec<usize>,
}

/// A read-only, navigable handle onto a group owned by a `Database`.
///
/// `GroupRef` is a thin `(&Database, index)` pair; it borrows the
/// database it was produced from rather than owning any tree state
/// itself.
#[derive(Clone, Copy)]
pub struct GroupRef<'a> {
    pub(crate) db: &'a Database,
    pub(crate) index: usize,
}

impl<'a> GroupRef<'a> {
    pub(crate) fn new(db: &'a Database, index: usize) -> GroupRef<'a> {
        GroupRef { db, index }
    }

    fn node(&self) -> &'a GroupNode {
        &self.db.groups[self.index]
    }

    /// This group's identifier.
    pub fn uuid(&self) -> &'a str {
        &self.node().group.uuid
    }

    /// The name of this group (`"/"` for the root group).
    pub fn name(&self) -> &'a str {
        &self.node().group.name
    }

    /// The notes of this group.
    pub fn notes(&self) -> &'a str {
        &self.node().group.notes
    }

    /// This group's synthesized absolute path.
    pub fn path(&self) -> &'a str {
        &self.node().path
    }

    /// Whether this is the database's root group.
    pub fn is_root(&self) -> bool {
        self.node().parent.is_none()
    }

    /// This group's parent, or `None` for the root group.
    pub fn parent(&self) -> Option<GroupRef<'a>> {
        self.node().parent.map(|idx| GroupRef::new(self.db, idx))
    }

    /// This group's immediate child groups, in insertion order.
    pub fn groups(&self) -> Vec<GroupRef<'a>> {
        self.node()
            .groups
            .iter()
            .map(|&idx| GroupRef::new(self.db, idx))
            .collect()
    }

    /// This group's immediate child entries, in insertion order.
    pub fn entries(&self) -> Vec<EntryRef<'a>> {
        self.node()
            .entries
            .iter()
            .map(|&idx| EntryRef::new(self.db, idx))
            .collect()
    }

    /// Sorted (case-insensitive, ascending) names of the immediate child
    /// groups.
    pub fn group_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.groups().iter().map(|g| g.name().to_string()).collect();
        names.sort_by_key(|name| name.to_lowercase());
        names
    }

    /// Sorted (case-insensitive, ascending) titles of the immediate child
    /// entries.
    pub fn entry_titles(&self) -> Vec<String> {
        let mut titles: Vec<String> = self
            .entries()
            .iter()
            .map(|e| e.title().to_string())
            .collect();
        titles.sort_by_key(|title| title.to_lowercase());
        titles
    }

    /// Whether an immediate child group matches `name`, case-insensitively.
    pub fn has_group(&self, name: &str) -> bool {
        self.groups().iter().any(|g| g.name().eq_ignore_ascii_case(name))
    }

    /// Whether an immediate child entry matches `title`, case-insensitively.
    pub fn has_entry(&self, title: &str) -> bool {
        self.entries()
            .iter()
            .any(|e| e.title().eq_ignore_ascii_case(title))
    }

    /// Resolves `path` (absolute or relative to this group) to a group.
    ///
    /// `/`-separated, case-insensitive on each segment; `""` and `.` are
    /// no-ops, `..` ascends (clamped at root), and empty segments from
    /// repeated slashes are skipped.
    pub fn find_group(&self, path: &str) -> Option<GroupRef<'a>> {
        let full = path::absolute_path(path, self.path());
        let mut current = self.db.root();
        if full == "/" {
            return Some(current);
        }
        for segment in full.trim_start_matches('/').split('/') {
            if segment.is_empty() {
                continue;
            }
            current = current
                .groups()
                .into_iter()
                .filter(|g| g.name().eq_ignore_ascii_case(segment))
                .last()?;
        }
        Some(current)
    }

    /// Splits `input` into `(dir, last)` on the final `/`, resolves `dir`
    /// relative to this group, and returns `(canonical_input,
    /// matching_group_names, matching_entry_titles)`.
    ///
    /// If `last` is itself an exact child group of the resolved `dir`,
    /// this re-roots into it and returns all of its children. Otherwise
    /// it returns the children of `dir` whose name/title
    /// case-insensitively starts with `last`. If `dir` cannot be
    /// resolved, returns `(input, [], [])`.
    pub fn fuzzy_find(&self, input: &str) -> (String, Vec<String>, Vec<String>) {
        let (dir, last) = split_last_segment(input);

        let dir_group = if dir.is_empty() {
            Some(*self)
        } else {
            self.find_group(&dir)
        };

        let dir_group = match dir_group {
            Some(group) => group,
            None => return (input.to_string(), Vec::new(), Vec::new()),
        };

        if !last.is_empty() {
            if let Some(exact) = dir_group
                .groups()
                .into_iter()
                .filter(|g| g.name().eq_ignore_ascii_case(&last))
                .last()
            {
                return (
                    exact.path().to_string(),
                    exact.group_names(),
                    exact.entry_titles(),
                );
            }
        }

        let canonical = path::absolute_path(input, self.path());
        let needle = last.to_lowercase();
        let groups: Vec<String> = dir_group
            .group_names()
            .into_iter()
            .filter(|name| name.to_lowercase().starts_with(&needle))
            .collect();
        let entries: Vec<String> = dir_group
            .entry_titles()
            .into_iter()
            .filter(|title| title.to_lowercase().starts_with(&needle))
            .collect();
        (canonical, groups, entries)
    }

    /// Renders the subtree rooted at this group as an indented text
    /// block. Each level adds two spaces of indentation; at `level` 0 the
    /// rendered label is this group's full path, otherwise its name.
    /// Entry passwords are masked unless `show_password` is set.
    pub fn details(&self, level: usize, show_password: bool) -> String {
        let indent = "  ".repeat(level);
        let label = if level == 0 {
            self.path().to_string()
        } else {
            self.name().to_string()
        };

        let mut out = format!("{}{}\n", indent, label);
        let field_indent = "  ".repeat(level + 1);

        for entry in self.entries() {
            out.push_str(&format!("{}{}\n", field_indent, entry.title()));
            out.push_str(&format!("{}  username: {}\n", field_indent, entry.username()));
            let password = if show_password {
                entry.password().to_string()
            } else {
                "********".to_string()
            };
            out.push_str(&format!("{}  password: {}\n", field_indent, password));
            out.push_str(&format!("{}  url: {}\n", field_indent, entry.url()));
        }

        for group in self.groups() {
            out.push_str(&group.details(level + 1, show_password));
        }

        out
    }
}

impl<'a> PartialEq for GroupRef<'a> {
    fn eq(&self, other: &GroupRef<'a>) -> bool {
        self.uuid() == other.uuid()
    }
}

impl<'a> Eq for GroupRef<'a> {}

impl<'a> PartialOrd for GroupRef<'a> {
    fn partial_cmp(&self, other: &GroupRef<'a>) -> Option<::std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<'a> Ord for GroupRef<'a> {
    fn cmp(&self, other: &GroupRef<'a>) -> ::std::cmp::Ordering {
        self.name().to_lowercase().cmp(&other.name().to_lowercase())
    }
}

fn split_last_segment(input: &str) -> (String, String) {
    match input.rfind('/') {
        Some(0) => (String::from("/"), input[1..].to_string()),
        Some(idx) => (input[..idx].to_string(), input[idx + 1..].to_string()),
        None => (String::new(), input.to_string()),
    }
}

#[cfg(test)]
mod tests {

    use super::super::database::Database;
    use super::super::entry::Entry;
    use super::*;

    fn sample_db() -> Database {
        let general = Group {
            uuid: String::from("g-general"),
            name: String::from("General"),
            notes: String::new(),
        };
        let mut db = Database::new_empty();
        let root = db.root_index();
        let general_idx = db.push_group(general, root, "/General".to_string());
        db.push_group(
            Group {
                uuid: String::from("g-alpha"),
                name: String::from("Alpha"),
                notes: String::new(),
            },
            general_idx,
            "/General/Alpha".to_string(),
        );
        db.push_group(
            Group {
                uuid: String::from("g-alfred"),
                name: String::from("Alfred"),
                notes: String::new(),
            },
            general_idx,
            "/General/Alfred".to_string(),
        );
        db.push_group(
            Group {
                uuid: String::from("g-beta"),
                name: String::from("Beta"),
                notes: String::new(),
            },
            general_idx,
            "/General/Beta".to_string(),
        );
        db.push_entry(
            Entry {
                uuid: String::from("e-sample"),
                title: String::from("Sample"),
                username: String::from("user"),
                password: String::from("pw"),
                url: String::new(),
                notes: String::new(),
                icon: None,
                tags: Vec::new(),
            },
            general_idx,
        );
        db
    }

    #[test]
    fn test_find_group_is_case_insensitive_and_absolute() {
        let db = sample_db();
        let root = db.root();
        let a = root.find_group("/General/Alpha").unwrap();
        let b = root.find_group("/general/alpha").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_find_group_collapses_repeated_slashes() {
        let db = sample_db();
        let root = db.root();
        assert!(root.find_group("//General//Alpha").is_some());
    }

    #[test]
    fn test_find_group_resolves_dot_dot_clamped_at_root() {
        let db = sample_db();
        let root = db.root();
        let general = root.find_group("/General").unwrap();
        let back = general.find_group("..").unwrap();
        assert_eq!(back, root);
        let clamped = root.find_group("../../..").unwrap();
        assert_eq!(clamped, root);
    }

    #[test]
    fn test_fuzzy_find_prefix_matches_only_expected_groups() {
        let db = sample_db();
        let root = db.root();
        let general = root.find_group("/General").unwrap();
        let (_, groups, entries) = general.fuzzy_find("Al");
        assert_eq!(groups, vec!["Alfred".to_string(), "Alpha".to_string()]);
        assert!(entries.is_empty());
    }

    #[test]
    fn test_fuzzy_find_exact_group_match_rerootes() {
        let db = sample_db();
        let root = db.root();
        let general = root.find_group("/General").unwrap();
        let (canonical, groups, entries) = general.fuzzy_find("Alpha");
        assert_eq!(canonical, "/General/Alpha");
        assert!(groups.is_empty());
        assert!(entries.is_empty());
    }

    #[test]
    fn test_fuzzy_find_unresolvable_dir_returns_input_and_empty_lists() {
        let db = sample_db();
        let root = db.root();
        let (canonical, groups, entries) = root.fuzzy_find("Nope/Al");
        assert_eq!(canonical, "Nope/Al");
        assert!(groups.is_empty());
        assert!(entries.is_empty());
    }

    #[test]
    fn test_has_entry_and_has_group_are_case_insensitive() {
        let db = sample_db();
        let general = db.root().find_group("/General").unwrap();
        assert!(general.has_entry("sample"));
        assert!(general.has_group("alpha"));
        assert!(!general.has_group("gamma"));
    }

    #[test]
    fn test_details_masks_password_unless_shown() {
        let db = sample_db();
        let general = db.root().find_group("/General").unwrap();
        let masked = general.details(1, false);
        assert!(masked.contains("********"));
        assert!(!masked.contains("pw\n"));
        let shown = general.details(1, true);
        assert!(shown.contains("password: pw"));
    }
}
