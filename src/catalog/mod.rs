//! The in-memory content catalog.
//!
//! A catalog is one immutable generation: an arena of entries built by a
//! single recursive scan over the configured share directories. It is
//! never patched in place; any change to the underlying filesystem or the
//! share list produces a whole new generation (see `state`).
//!
//! Entry ids are assigned sequentially in scan (pre-)order starting from
//! the configured base, so id lookup is an arena offset.

mod entry;

pub use entry::{Entry, EntryKind};

use crate::mime;
use dircast_common::EntryId;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

/// Title substituted when stripping an extension would leave nothing.
const TITLE_UNKNOWN: &str = "unknown";

/// One configured share: a name and the directory it exports.
#[derive(Debug, Clone)]
pub struct Share {
    pub name: String,
    pub path: PathBuf,
}

impl Share {
    /// A share rooted at `path`, named after its final path component.
    pub fn from_path(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| TITLE_UNKNOWN.to_string());
        Self { name, path }
    }
}

/// One complete catalog generation.
#[derive(Debug)]
pub struct Catalog {
    base: u32,
    entries: Vec<Entry>,
}

impl Catalog {
    /// Look up an entry by id. O(1): the id is an arena offset.
    pub fn get(&self, id: u32) -> Option<&Entry> {
        let idx = id.checked_sub(self.base)? as usize;
        self.entries.get(idx)
    }

    /// The synthetic root container.
    pub fn root(&self) -> &Entry {
        &self.entries[0]
    }

    /// First id of this generation (the root's id).
    pub fn base(&self) -> u32 {
        self.base
    }

    /// Total number of entries, root included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate all entries in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }
}

/// Builds one catalog generation from a share list.
pub struct CatalogBuilder {
    base: u32,
    base_url: String,
}

impl CatalogBuilder {
    /// `base_url` is the server origin items embed in their URLs,
    /// e.g. `http://192.168.1.10:5279`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base: 0,
            base_url: base_url.into(),
        }
    }

    /// Start id assignment from `base` instead of 0.
    pub fn with_base(mut self, base: u32) -> Self {
        self.base = base;
        self
    }

    /// Scan every share and return the populated catalog.
    ///
    /// Unreadable directories, unstattable files, and files with unknown
    /// extensions are skipped; a scan failure never aborts the build.
    pub fn build(&self, shares: &[Share]) -> Catalog {
        info!("Building content catalog");

        let mut catalog = Catalog {
            base: self.base,
            entries: Vec::new(),
        };

        let root_id = self.push_container(&mut catalog, None, "root".to_string(), None);

        for share in shares {
            if !share.path.is_dir() {
                warn!("Share path is not a directory, skipping: {:?}", share.path);
                continue;
            }
            info!("Looking for files in share: {:?}", share.path);

            let share_id = self.push_container(
                &mut catalog,
                Some(root_id),
                container_title(&share.name),
                Some(share.path.clone()),
            );
            self.scan_share(&mut catalog, share_id, &share.path);
        }

        info!(
            "Found {} files and subdirectories",
            catalog.len().saturating_sub(1)
        );
        catalog
    }

    /// Walk one share directory, mirroring it under `share_id`.
    ///
    /// Entries arrive in depth-first order with each directory's contents
    /// sorted by filename, so ids come out in pre-order and each parent's
    /// child list is sorted. Hidden entries are pruned with their whole
    /// subtree.
    fn scan_share(&self, catalog: &mut Catalog, share_id: EntryId, share_path: &Path) {
        // (walkdir depth, container id); the share root sits at depth 0.
        let mut stack: Vec<(usize, EntryId)> = vec![(0, share_id)];

        let walker = WalkDir::new(share_path)
            .min_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_hidden(e));

        for dirent in walker {
            let dirent = match dirent {
                Ok(e) => e,
                Err(e) => {
                    warn!("Skipping unreadable directory entry: {}", e);
                    continue;
                }
            };

            while let Some((depth, _)) = stack.last() {
                if *depth >= dirent.depth() {
                    stack.pop();
                } else {
                    break;
                }
            }
            let parent = match stack.last() {
                Some((_, id)) => *id,
                // Cannot happen: the share root is never popped.
                None => share_id,
            };

            let name = dirent.file_name().to_string_lossy().into_owned();

            if dirent.file_type().is_dir() {
                let id = self.push_container(
                    catalog,
                    Some(parent),
                    container_title(&name),
                    Some(dirent.path().to_path_buf()),
                );
                stack.push((dirent.depth(), id));
            } else {
                self.add_file(catalog, parent, &name, dirent.path());
            }
        }
    }

    /// Classify and append one regular file, if the type table knows it.
    fn add_file(&self, catalog: &mut Catalog, parent: EntryId, name: &str, path: &Path) {
        let Some(classification) = mime::classify(name) else {
            debug!("No type rule for {:?}, excluded from catalog", path);
            return;
        };

        let size = match std::fs::metadata(path) {
            Ok(meta) => meta.len() as i64,
            Err(e) => {
                warn!("Cannot stat {:?}, skipping: {}", path, e);
                return;
            }
        };

        let id = self.next_id(catalog);
        let url = format!("{}{}/{}", self.base_url, crate::VIRTUAL_DIR, id);
        debug!("Entry {} -> {}", id, url);

        catalog.entries.push(Entry {
            id,
            parent: Some(parent),
            title: item_title(name),
            class: classification.class,
            path: Some(path.to_path_buf()),
            kind: EntryKind::Item {
                protocol_info: classification.protocol_info,
                size,
                url,
            },
        });
        self.attach(catalog, parent, id);
    }

    fn push_container(
        &self,
        catalog: &mut Catalog,
        parent: Option<EntryId>,
        title: String,
        path: Option<PathBuf>,
    ) -> EntryId {
        let id = self.next_id(catalog);
        catalog.entries.push(Entry {
            id,
            parent,
            title,
            class: mime::CLASS_CONTAINER,
            path,
            kind: EntryKind::Container {
                children: Vec::new(),
            },
        });
        if let Some(parent) = parent {
            self.attach(catalog, parent, id);
        }
        id
    }

    fn attach(&self, catalog: &mut Catalog, parent: EntryId, child: EntryId) {
        let idx = (parent.value() - self.base) as usize;
        if let EntryKind::Container { children } = &mut catalog.entries[idx].kind {
            children.push(child);
        }
    }

    fn next_id(&self, catalog: &Catalog) -> EntryId {
        EntryId::new(self.base + catalog.entries.len() as u32)
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

/// Item display title: the filename with its final extension stripped.
fn item_title(name: &str) -> String {
    let stem = match name.rsplit_once('.') {
        Some((stem, _)) => stem,
        None => name,
    };
    if stem.is_empty() {
        TITLE_UNKNOWN.to_string()
    } else {
        stem.to_string()
    }
}

/// Container display title: the name as-is, with the empty-name guard.
fn container_title(name: &str) -> String {
    if name.is_empty() {
        TITLE_UNKNOWN.to_string()
    } else {
        name.to_string()
    }
}
