//! Integration tests for the browse engine against built catalogs.

mod common;

use common::{build_catalog, media_tree, write_file};
use dircast::browse::{browse, BrowseFlag, BrowseRequest};
use dircast_common::Error;

fn request(object_id: u32, flag: BrowseFlag, start: u32, count: u32) -> BrowseRequest {
    BrowseRequest {
        object_id,
        flag,
        starting_index: start,
        requested_count: count,
        sort_criteria: String::new(),
        filter: String::new(),
    }
}

#[test]
fn end_to_end_scenario() {
    // Shares [("Movies", dir)] with a.avi (100 bytes) and skip.txt.
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "a.avi", &[0u8; 100]);
    write_file(dir.path(), "skip.txt", b"notes");
    let catalog = build_catalog("Movies", &dir);

    let resp = browse(&catalog, &request(0, BrowseFlag::DirectChildren, 0, 0)).unwrap();
    assert_eq!(resp.number_returned, 1);
    assert_eq!(resp.total_matches, 1);
    assert!(resp.result.contains("<dc:title>Movies</dc:title>"));

    let movies = catalog.get(1).unwrap();
    assert_eq!(movies.child_count(), 1);
    let a = catalog.get(movies.children()[0].value()).unwrap();
    assert_eq!(a.title, "a");
    assert_eq!(a.size(), 100);
    assert_eq!(a.class, "object.item.videoItem.movie");
}

#[test]
fn direct_children_unbounded_returns_all() {
    let dir = media_tree();
    let catalog = build_catalog("Movies", &dir);
    let share = catalog.get(1).unwrap();
    let n = share.children().len() as u32;

    let resp = browse(&catalog, &request(1, BrowseFlag::DirectChildren, 0, 0)).unwrap();
    assert_eq!(resp.number_returned, n);
    assert_eq!(resp.total_matches, n);
}

#[test]
fn direct_children_pagination_windows() {
    let dir = tempfile::tempdir().unwrap();
    for i in 0..5 {
        write_file(dir.path(), &format!("f{i}.avi"), b"x");
    }
    let catalog = build_catalog("m", &dir);

    // N = 5 children of the share container (id 1).
    for (start, count, expect) in [
        (0u32, 0u32, 5u32),
        (0, 2, 2),
        (3, 2, 2),
        (4, 2, 1),
        (2, 0, 3),
        (5, 1, 0),
        (9, 0, 0),
    ] {
        let resp = browse(&catalog, &request(1, BrowseFlag::DirectChildren, start, count)).unwrap();
        assert_eq!(resp.number_returned, expect, "start={start} count={count}");
        // The full child count is always reported, whatever the window.
        assert_eq!(resp.total_matches, 5, "start={start} count={count}");
    }
}

#[test]
fn metadata_is_always_a_singleton() {
    let dir = media_tree();
    let catalog = build_catalog("Movies", &dir);

    // Container with several children: still 1/1.
    let resp = browse(&catalog, &request(1, BrowseFlag::Metadata, 0, 0)).unwrap();
    assert_eq!(resp.number_returned, 1);
    assert_eq!(resp.total_matches, 1);

    // Item with no children: also 1/1, whatever the requested window.
    let item = catalog.iter().find(|e| !e.is_container()).unwrap();
    let resp = browse(&catalog, &request(item.id.value(), BrowseFlag::Metadata, 0, 50)).unwrap();
    assert_eq!(resp.number_returned, 1);
    assert_eq!(resp.total_matches, 1);
}

#[test]
fn metadata_rejects_pagination() {
    let dir = media_tree();
    let catalog = build_catalog("Movies", &dir);

    let err = browse(&catalog, &request(0, BrowseFlag::Metadata, 5, 0)).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
}

#[test]
fn invalid_flag_fails_before_lookup() {
    let err = "Bogus".parse::<BrowseFlag>().unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
}

#[test]
fn unknown_object_fails() {
    let dir = media_tree();
    let catalog = build_catalog("Movies", &dir);

    let err = browse(&catalog, &request(9999, BrowseFlag::DirectChildren, 0, 0)).unwrap_err();
    assert!(matches!(err, Error::NoSuchObject(9999)));
}

#[test]
fn items_are_not_browsable() {
    let dir = media_tree();
    let catalog = build_catalog("Movies", &dir);
    let item = catalog.iter().find(|e| !e.is_container()).unwrap();

    let err = browse(
        &catalog,
        &request(item.id.value(), BrowseFlag::DirectChildren, 0, 0),
    )
    .unwrap_err();
    assert!(matches!(err, Error::NotBrowsable(_)));
}

#[test]
fn update_id_is_always_zero() {
    let dir = media_tree();
    let catalog = build_catalog("Movies", &dir);

    let resp = browse(&catalog, &request(0, BrowseFlag::Metadata, 0, 0)).unwrap();
    assert_eq!(resp.update_id, "0");
}

#[test]
fn titles_are_escaped_in_results() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "Tom & Jerry's <Best>.avi", b"x");
    let catalog = build_catalog("m", &dir);

    let resp = browse(&catalog, &request(1, BrowseFlag::DirectChildren, 0, 0)).unwrap();
    assert!(resp
        .result
        .contains("<dc:title>Tom &amp; Jerry&apos;s &lt;Best&gt;</dc:title>"));
    assert!(!resp.result.contains("Jerry's"));
}

#[test]
fn metadata_document_shape() {
    let dir = media_tree();
    let catalog = build_catalog("Movies", &dir);

    // Root container: parentID -1, searchable advertised.
    let resp = browse(&catalog, &request(0, BrowseFlag::Metadata, 0, 0)).unwrap();
    assert!(resp.result.starts_with("<DIDL-Lite "));
    assert!(resp.result.ends_with("</DIDL-Lite>"));
    assert!(resp
        .result
        .contains("<container id=\"0\" parentID=\"-1\" childCount=\"1\" restricted=\"true\" searchable=\"true\">"));

    // Item metadata: restricted="0", size omitted, URL present.
    let item = catalog.iter().find(|e| e.title == "a").unwrap();
    let resp = browse(&catalog, &request(item.id.value(), BrowseFlag::Metadata, 0, 0)).unwrap();
    assert!(resp.result.contains("restricted=\"0\""));
    assert!(!resp.result.contains("size="));
    assert!(resp.result.contains(&format!("/web/{}</res>", item.id)));
}

#[test]
fn children_document_shape() {
    let dir = media_tree();
    let catalog = build_catalog("Movies", &dir);

    let resp = browse(&catalog, &request(1, BrowseFlag::DirectChildren, 0, 0)).unwrap();

    // Subcontainers advertise childCount but not searchable.
    assert!(resp.result.contains("childCount=\"1\""));
    assert!(!resp.result.contains("searchable"));

    // Items carry restricted="true", their size and protocol info.
    assert!(resp.result.contains("restricted=\"true\""));
    assert!(resp.result.contains("size=\"100\""));
    assert!(resp
        .result
        .contains("protocolInfo=\"http-get:*:video/x-msvideo:*\""));
}
