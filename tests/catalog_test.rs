//! Integration tests for the catalog build over real directories.

mod common;

use common::{build_catalog, media_tree, write_file, BASE_URL};
use dircast::catalog::{CatalogBuilder, Share};

#[test]
fn share_tree_is_mirrored() {
    let dir = media_tree();
    let catalog = build_catalog("Movies", &dir);

    // root + share + a.avi + b.mkv + Series + ep1.avi
    assert_eq!(catalog.len(), 6);

    let root = catalog.root();
    assert_eq!(root.id.value(), 0);
    assert_eq!(root.child_count(), 1);

    let share = catalog.get(root.children()[0].value()).unwrap();
    assert_eq!(share.title, "Movies");
    assert!(share.is_container());
    assert_eq!(share.parent, Some(root.id));
    // skip.txt is filtered out: a.avi, b.mkv, Series
    assert_eq!(share.child_count(), 3);
}

#[test]
fn unclassified_files_are_excluded() {
    let dir = media_tree();
    let catalog = build_catalog("Movies", &dir);

    assert!(catalog.iter().all(|e| e.title != "skip"));
    assert!(catalog.iter().any(|e| e.title == "a"));
}

#[test]
fn hidden_entries_are_pruned() {
    let dir = media_tree();
    write_file(dir.path(), ".hidden/secret.avi", b"x");
    write_file(dir.path(), ".stray.avi", b"x");

    let catalog = build_catalog("Movies", &dir);
    assert_eq!(catalog.len(), 6);
    assert!(catalog.iter().all(|e| !e.title.contains("secret")));
    assert!(catalog.iter().all(|e| !e.title.contains("stray")));
}

#[test]
fn children_are_sorted_and_ids_preorder() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "b.avi", b"b");
    write_file(dir.path(), "a.avi", b"a");
    write_file(dir.path(), "c/d.avi", b"d");

    let catalog = build_catalog("m", &dir);

    let share = catalog.get(1).unwrap();
    let titles: Vec<&str> = share
        .children()
        .iter()
        .map(|id| catalog.get(id.value()).unwrap().title.as_str())
        .collect();
    assert_eq!(titles, ["a", "b", "c"]);

    // Pre-order assignment: share 1, a 2, b 3, c 4, d 5.
    let ids: Vec<u32> = share.children().iter().map(|id| id.value()).collect();
    assert_eq!(ids, [2, 3, 4]);
    let c = catalog.get(4).unwrap();
    assert_eq!(c.children()[0].value(), 5);
    assert_eq!(catalog.get(5).unwrap().title, "d");
}

#[test]
fn item_fields_are_populated() {
    let dir = media_tree();
    let catalog = build_catalog("Movies", &dir);

    let a = catalog.iter().find(|e| e.title == "a").unwrap();
    assert!(!a.is_container());
    assert_eq!(a.size(), 100);
    assert_eq!(a.child_count(), -1);
    assert_eq!(a.class, "object.item.videoItem.movie");
    assert_eq!(
        a.protocol_info(),
        Some("http-get:*:video/x-msvideo:*")
    );
    assert_eq!(
        a.url().unwrap(),
        format!("{}/web/{}", BASE_URL, a.id)
    );
    assert_eq!(a.path.as_deref(), Some(dir.path().join("a.avi").as_path()));
}

#[test]
fn final_extension_is_stripped_from_titles() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "Movie.Title.mkv", b"x");

    let catalog = build_catalog("m", &dir);
    assert!(catalog.iter().any(|e| e.title == "Movie.Title"));
}

#[test]
fn titles_are_never_empty() {
    let dir = media_tree();
    let catalog = build_catalog("Movies", &dir);
    assert!(catalog.iter().all(|e| !e.title.is_empty()));
}

#[test]
fn find_round_trips_every_id() {
    let dir = media_tree();
    let catalog = build_catalog("Movies", &dir);

    for entry in catalog.iter() {
        let found = catalog.get(entry.id.value()).unwrap();
        assert_eq!(found.id, entry.id);
        assert_eq!(found.title, entry.title);
    }
    assert!(catalog.get(catalog.len() as u32).is_none());
}

#[test]
fn parents_link_back() {
    let dir = media_tree();
    let catalog = build_catalog("Movies", &dir);

    for entry in catalog.iter() {
        match entry.parent {
            Some(parent) => {
                let parent = catalog.get(parent.value()).unwrap();
                assert!(parent.children().contains(&entry.id));
            }
            None => assert_eq!(entry.id.value(), 0),
        }
    }
}

#[test]
fn container_child_count_matches_children() {
    let dir = media_tree();
    let catalog = build_catalog("Movies", &dir);

    for entry in catalog.iter() {
        if entry.is_container() {
            assert_eq!(entry.child_count(), entry.children().len() as i64);
        } else {
            assert!(entry.children().is_empty());
            assert!(entry.size() >= 0);
        }
    }
}

#[test]
fn rebuild_reassigns_ids() {
    let dir = media_tree();
    let catalog = build_catalog("Movies", &dir);
    let ep1_id = catalog
        .iter()
        .find(|e| e.title == "ep1")
        .unwrap()
        .id
        .value();

    // A file sorting before the others shifts every later id on rebuild.
    write_file(dir.path(), "0.avi", b"x");
    let rebuilt = build_catalog("Movies", &dir);
    let ep1_new = rebuilt.iter().find(|e| e.title == "ep1").unwrap().id.value();

    assert_ne!(ep1_id, ep1_new);
}

#[test]
fn multiple_shares_under_one_root() {
    let movies = media_tree();
    let music = tempfile::tempdir().unwrap();
    write_file(music.path(), "song.mp3", b"mp3");

    let catalog = CatalogBuilder::new(BASE_URL).build(&[
        Share {
            name: "Movies".to_string(),
            path: movies.path().to_path_buf(),
        },
        Share {
            name: "Music".to_string(),
            path: music.path().to_path_buf(),
        },
    ]);

    let root = catalog.root();
    assert_eq!(root.child_count(), 2);
    let names: Vec<&str> = root
        .children()
        .iter()
        .map(|id| catalog.get(id.value()).unwrap().title.as_str())
        .collect();
    assert_eq!(names, ["Movies", "Music"]);
}

#[test]
fn missing_share_is_skipped() {
    let catalog = CatalogBuilder::new(BASE_URL).build(&[Share {
        name: "gone".to_string(),
        path: "/definitely/not/here".into(),
    }]);
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.root().child_count(), 0);
}

#[test]
fn nonzero_base_offsets_every_id() {
    let dir = media_tree();
    let catalog = CatalogBuilder::new(BASE_URL)
        .with_base(1000)
        .build(&[Share {
            name: "Movies".to_string(),
            path: dir.path().to_path_buf(),
        }]);

    assert_eq!(catalog.root().id.value(), 1000);
    assert!(catalog.get(0).is_none());
    for entry in catalog.iter() {
        assert!(entry.id.value() >= 1000);
        assert_eq!(catalog.get(entry.id.value()).unwrap().id, entry.id);
    }
}
