//! Catalog entry nodes.

use dircast_common::EntryId;
use std::path::PathBuf;

/// What an entry is: a directory-like container or a file-like item.
#[derive(Debug, Clone)]
pub enum EntryKind {
    /// A directory. Children are arena ids, in insertion order.
    Container { children: Vec<EntryId> },
    /// A file with a byte stream.
    Item {
        /// Transport protocol descriptor from the type table.
        protocol_info: String,
        /// File size in bytes at scan time.
        size: i64,
        /// Absolute URL embedding this entry's id.
        url: String,
    },
}

/// One node in the content catalog.
#[derive(Debug, Clone)]
pub struct Entry {
    pub id: EntryId,
    /// Back-index to the parent; `None` only for the synthetic root.
    pub parent: Option<EntryId>,
    /// Display name. Never empty; item titles have the final extension
    /// stripped.
    pub title: String,
    /// Content-directory object class.
    pub class: &'static str,
    /// Absolute filesystem path; `None` only for the synthetic root.
    pub path: Option<PathBuf>,
    pub kind: EntryKind,
}

impl Entry {
    pub fn is_container(&self) -> bool {
        matches!(self.kind, EntryKind::Container { .. })
    }

    /// Child ids; empty for items.
    pub fn children(&self) -> &[EntryId] {
        match &self.kind {
            EntryKind::Container { children } => children,
            EntryKind::Item { .. } => &[],
        }
    }

    /// Child count in the legacy wire encoding: `-1` means item.
    pub fn child_count(&self) -> i64 {
        match &self.kind {
            EntryKind::Container { children } => children.len() as i64,
            EntryKind::Item { .. } => -1,
        }
    }

    /// Byte size in the legacy wire encoding: `-1` means container.
    pub fn size(&self) -> i64 {
        match &self.kind {
            EntryKind::Container { .. } => -1,
            EntryKind::Item { size, .. } => *size,
        }
    }

    pub fn protocol_info(&self) -> Option<&str> {
        match &self.kind {
            EntryKind::Container { .. } => None,
            EntryKind::Item { protocol_info, .. } => Some(protocol_info),
        }
    }

    pub fn url(&self) -> Option<&str> {
        match &self.kind {
            EntryKind::Container { .. } => None,
            EntryKind::Item { url, .. } => Some(url),
        }
    }

    /// Parent id in the legacy wire encoding: `-1` for the root.
    pub fn parent_id(&self) -> i64 {
        match self.parent {
            Some(id) => i64::from(id.value()),
            None => -1,
        }
    }
}
