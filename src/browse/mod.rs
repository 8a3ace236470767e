//! The browse engine.
//!
//! Answers content-directory Browse actions against one catalog
//! generation. Stateless: every request is resolved against the snapshot
//! it was handed and nothing persists across requests.

mod didl;

pub use didl::DidlWriter;

use crate::catalog::{Catalog, Entry};
use dircast_common::{Error, Result};
use serde::Serialize;

/// Browse mode, parsed from the `BrowseFlag` action argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseFlag {
    /// Describe the target entry itself.
    Metadata,
    /// List the target container's children.
    DirectChildren,
}

impl std::str::FromStr for BrowseFlag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "BrowseMetadata" => Ok(Self::Metadata),
            "BrowseDirectChildren" => Ok(Self::DirectChildren),
            other => Err(Error::invalid_argument(format!(
                "unknown BrowseFlag: {other:?}"
            ))),
        }
    }
}

/// One parsed Browse action.
#[derive(Debug, Clone)]
pub struct BrowseRequest {
    pub object_id: u32,
    pub flag: BrowseFlag,
    pub starting_index: u32,
    /// 0 means unbounded.
    pub requested_count: u32,
    /// Accepted and ignored; no sort capability is advertised.
    pub sort_criteria: String,
    /// Accepted and ignored; every field is always returned.
    pub filter: String,
}

/// The filled Browse response.
#[derive(Debug, Clone, Serialize)]
pub struct BrowseResponse {
    /// The DIDL-Lite result document.
    #[serde(rename = "Result")]
    pub result: String,
    #[serde(rename = "NumberReturned")]
    pub number_returned: u32,
    #[serde(rename = "TotalMatches")]
    pub total_matches: u32,
    /// Always `"0"`: no catalog versioning is exposed.
    #[serde(rename = "UpdateID")]
    pub update_id: String,
}

/// Answer one Browse action against `catalog`.
pub fn browse(catalog: &Catalog, req: &BrowseRequest) -> Result<BrowseResponse> {
    // Metadata browsing has no pagination; reject before any lookup.
    if req.flag == BrowseFlag::Metadata && req.starting_index != 0 {
        return Err(Error::invalid_argument(
            "StartingIndex must be 0 for BrowseMetadata",
        ));
    }

    let entry = catalog
        .get(req.object_id)
        .ok_or_else(|| Error::no_such_object(req.object_id))?;

    match req.flag {
        BrowseFlag::Metadata => Ok(browse_metadata(entry)),
        BrowseFlag::DirectChildren => {
            browse_direct_children(catalog, entry, req.starting_index, req.requested_count)
        }
    }
}

/// Describe `entry` itself. Always one result: 1 returned, 1 matched,
/// whatever the entry's child count.
fn browse_metadata(entry: &Entry) -> BrowseResponse {
    let mut out = DidlWriter::new();

    if entry.is_container() {
        out.add_container(
            i64::from(entry.id.value()),
            entry.parent_id(),
            entry.child_count(),
            Some("true"),
            Some("true"),
            &entry.title,
            entry.class,
        );
    } else {
        // Metadata items historically report restricted="0" and omit the
        // resource size.
        out.add_item(
            i64::from(entry.id.value()),
            entry.parent_id(),
            Some("0"),
            entry.class,
            &entry.title,
            entry.protocol_info(),
            -1,
            entry.url(),
        );
    }

    BrowseResponse {
        result: out.finish(),
        number_returned: 1,
        total_matches: 1,
        update_id: "0".to_string(),
    }
}

/// List the children of `entry` within the requested window.
///
/// `total_matches` always reports the full child count, whatever the
/// window, so clients can page to the end; an out-of-range start yields
/// an empty result, not an error.
fn browse_direct_children(
    catalog: &Catalog,
    entry: &Entry,
    starting_index: u32,
    requested_count: u32,
) -> Result<BrowseResponse> {
    if !entry.is_container() {
        return Err(Error::not_browsable(entry.id.value()));
    }

    let children = entry.children();
    let mut out = DidlWriter::new();
    let mut returned: u32 = 0;

    for child_id in children.iter().skip(starting_index as usize) {
        if requested_count != 0 && returned >= requested_count {
            break;
        }
        // Child ids were assigned by the same generation's build; a miss
        // here would be a builder bug.
        let child = catalog
            .get(child_id.value())
            .ok_or_else(|| Error::internal(format!("dangling child id {child_id}")))?;

        if child.is_container() {
            out.add_container(
                i64::from(child.id.value()),
                child.parent_id(),
                child.child_count(),
                Some("true"),
                None,
                &child.title,
                child.class,
            );
        } else {
            out.add_item(
                i64::from(child.id.value()),
                child.parent_id(),
                Some("true"),
                child.class,
                &child.title,
                child.protocol_info(),
                child.size(),
                child.url(),
            );
        }
        returned += 1;
    }

    Ok(BrowseResponse {
        result: out.finish(),
        number_returned: returned,
        total_matches: children.len() as u32,
        update_id: "0".to_string(),
    })
}
