use tierz::api::{DropTarget, TierzApi, TierzPaths};
use tierz::model::{ItemId, TierId};
use tierz::store::fs_backend::FsBackend;
use std::path::Path;

fn open(dir: &Path) -> TierzApi<FsBackend> {
    TierzApi::open(
        FsBackend::new(dir.to_path_buf()),
        TierzPaths::new(dir.to_path_buf()),
    )
    .unwrap()
}

fn names(api: &TierzApi<FsBackend>, tier: &str) -> Vec<String> {
    api.session()
        .arrangement()
        .items_in_tier(&TierId::from(tier))
        .unwrap()
        .into_iter()
        .map(|i| i.name)
        .collect()
}

#[test]
fn moves_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();

    let mut api = open(dir.path());
    api.request_move("Kabukicho", "B", 1).unwrap();
    api.request_drop("Ikebukuro", DropTarget::Tier(TierId::from("SSS")))
        .unwrap();
    let b = names(&api, "B");
    drop(api);

    let reopened = open(dir.path());
    assert_eq!(names(&reopened, "B"), b);
    assert_eq!(names(&reopened, "B")[1], "Kabukicho");
    assert!(names(&reopened, "C").is_empty());
    assert_eq!(names(&reopened, "SSS"), vec!["Yokohama Kannai", "Ikebukuro"]);
    assert!(reopened.session().last_updated().is_some());
}

#[test]
fn rejected_moves_write_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut api = open(dir.path());
    let before = std::fs::read_to_string(dir.path().join("items.json")).unwrap();

    api.request_move("Mita", "A", 0).unwrap();
    api.request_move("Meguro", "EX", 0).unwrap();
    api.request_move("Meguro", "A", 0).unwrap();

    let after = std::fs::read_to_string(dir.path().join("items.json")).unwrap();
    assert_eq!(before, after);
    assert_eq!(api.render_root().revision, 0);
}

#[test]
fn positions_stay_contiguous_after_many_moves() {
    let dir = tempfile::tempdir().unwrap();
    let mut api = open(dir.path());

    let moves = [
        ("Meguro", "S", 0),
        ("Sengawa", "S", 9),
        ("Chiba", "C", 1),
        ("Meguro", "A", 3),
        ("Kyoto", "A", 0),
    ];
    for (item, tier, pos) in moves {
        api.request_move(item, tier, pos).unwrap();
    }

    let reopened = open(dir.path());
    let session = reopened.session();
    session
        .arrangement()
        .check_invariants(session.rules())
        .unwrap();
    for row in session.view() {
        for (i, item) in row.items.iter().enumerate() {
            assert_eq!(item.position, i);
        }
    }
    assert_eq!(session.arrangement().len(), 44);
    assert_eq!(
        session.arrangement().tier_of(&ItemId::from("1")),
        Some(&TierId::from("EX"))
    );
}
