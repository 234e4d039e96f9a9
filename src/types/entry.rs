// Copyright (c) 2016-2017 Martijn Rijkeboer <mrr@sru-systems.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! An entry in the tree and the navigable handle onto it.

use super::database::Database;
use super::group::GroupRef;

/// The data carried by an entry: a single credential record.
#[derive(Clone, Debug, PartialEq)]
pub struct Entry {
    /// This entry's identifier.
    pub uuid: String,

    /// The title of this entry.
    pub title: String,

    /// The username of this entry.
    pub username: String,

    /// The plaintext password of this entry, recovered from its
    /// protected field.
    pub password: String,

    /// The URL of this entry.
    pub url: String,

    /// The notes of this entry.
    pub notes: String,

    /// The icon identifier of this entry, if present.
    pub icon: Option<i32>,

    /// The tags associated with this entry.
    pub tags: Vec<String>,
}

/// An entry's node inside the database's arena: the entry's data plus its
/// weak link to its containing group.
#[derive(Clone, Debug)]
pub(crate) struct EntryNode {
    pub entry: Entry,
    pub parent: usize,
}

/// A read-only, navigable handle onto an entry owned by a `Database`.
///
/// `EntryRef` is a thin `(&Database, index)` pair, mirroring `GroupRef`.
#[derive(Clone, Copy)]
pub struct EntryRef<'a> {
    pub(crate) db: &'a Database,
    pub(crate) index: usize,
}

impl<'a> EntryRef<'a> {
    pub(crate) fn new(db: &'a Database, index: usize) -> EntryRef<'a> {
        EntryRef { db, index }
    }

    fn node(&self) -> &'a EntryNode {
        &self.db.entries[self.index]
    }

    /// This entry's identifier.
    pub fn uuid(&self) -> &'a str {
        &self.node().entry.uuid
    }

    /// The title of this entry.
    pub fn title(&self) -> &'a str {
        &self.node().entry.title
    }

    /// The username of this entry.
    pub fn username(&self) -> &'a str {
        &self.node().entry.username
    }

    /// The plaintext password of this entry.
    pub fn password(&self) -> &'a str {
        &self.node().entry.password
    }

    /// The URL of this entry.
    pub fn url(&self) -> &'a str {
        &self.node().entry.url
    }

    /// The notes of this entry.
    pub fn notes(&self) -> &'a str {
        &self.node().entry.notes
    }

    /// The icon identifier of this entry, if present.
    pub fn icon(&self) -> Option<i32> {
        self.node().entry.icon
    }

    /// The tags associated with this entry.
    pub fn tags(&self) -> &'a [String] {
        &self.node().entry.tags
    }

    /// The group containing this entry.
    pub fn group(&self) -> GroupRef<'a> {
        GroupRef::new(self.db, self.node().parent)
    }
}

impl<'a> PartialEq for EntryRef<'a> {
    fn eq(&self, other: &EntryRef<'a>) -> bool {
        self.uuid() == other.uuid()
    }
}

impl<'a> Eq for EntryRef<'a> {}
