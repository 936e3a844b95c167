//! End-to-end behavior of the catalog through its public API.
//!
//! Every test gets its own in-memory store and a manual clock so ordering
//! by `updated_at` is deterministic.

use shelf_core::catalog::{Catalog, WorkFilter};
use shelf_core::clock::ManualClock;
use shelf_core::model::{NewWork, Progress, Work, WorkId, WorkPatch, WorkStatus, WorkType};
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn catalog() -> (Catalog, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(1_700_000_000_000, 1_000));
    let cat = Catalog::open_in_memory()
        .expect("open in-memory catalog")
        .with_clock(Arc::clone(&clock));
    (cat, clock)
}

fn add(cat: &mut Catalog, title: &str, work_type: WorkType, status: WorkStatus) -> WorkId {
    cat.create(&NewWork::new(title, work_type, status))
        .expect("create work")
}

fn fetch(cat: &Catalog, id: &WorkId) -> Work {
    cat.get(id).expect("get work").expect("work present")
}

fn status_patch(status: WorkStatus) -> WorkPatch {
    WorkPatch {
        status: Some(status),
        ..WorkPatch::default()
    }
}

// ---------------------------------------------------------------------------
// Create / get
// ---------------------------------------------------------------------------

#[test]
fn created_work_reads_back_normalized() {
    let (mut cat, _) = catalog();
    let mut new = NewWork::new("  The Left Hand of Darkness ", WorkType::Book, WorkStatus::Backlog);
    new.creator = Some("  Ursula K. Le Guin".into());
    new.review = Some("   ".into());
    new.cover_url = Some(String::new());
    new.year = Some(1969);
    new.rating = Some(5);
    new.tags = vec![" Sci-Fi ".into(), String::new(), "DRAMA".into()];

    let id = cat.create(&new).expect("create");
    let work = fetch(&cat, &id);

    assert_eq!(work.id, id);
    assert_eq!(work.title, "The Left Hand of Darkness");
    assert_eq!(work.creator.as_deref(), Some("Ursula K. Le Guin"));
    assert_eq!(work.review, None);
    assert_eq!(work.cover_url, None);
    assert_eq!(work.year, Some(1969));
    assert_eq!(work.rating, Some(5));
    assert_eq!(work.tags, vec!["sci-fi", "drama"]);
    assert_eq!(work.created_at, work.updated_at);
}

#[test]
fn tags_are_truncated_to_twenty() {
    let (mut cat, _) = catalog();
    let mut new = NewWork::new("Tagged", WorkType::Series, WorkStatus::Backlog);
    new.tags = (0..25).map(|i| format!("Tag{i}")).collect();

    let id = cat.create(&new).expect("create");
    let work = fetch(&cat, &id);
    assert_eq!(work.tags.len(), 20);
    assert_eq!(work.tags.first().map(String::as_str), Some("tag0"));
    assert_eq!(work.tags.last().map(String::as_str), Some("tag19"));
}

#[test]
fn get_unknown_id_is_absent_not_error() {
    let (cat, _) = catalog();
    let missing = cat.get(&WorkId::from_raw("wk-ffffffffff")).expect("lookup");
    assert!(missing.is_none());
}

// ---------------------------------------------------------------------------
// Validation failures
// ---------------------------------------------------------------------------

#[test]
fn out_of_range_ratings_fail_create_and_update() {
    let (mut cat, _) = catalog();
    let id = add(&mut cat, "Heat", WorkType::Movie, WorkStatus::Finished);

    for bad in [0, 6, -3] {
        let mut new = NewWork::new("Heat", WorkType::Movie, WorkStatus::Finished);
        new.rating = Some(bad);
        assert!(cat.create(&new).expect_err("bad rating").is_invalid_argument());

        let patch = WorkPatch {
            rating: Some(Some(bad)),
            ..WorkPatch::default()
        };
        assert!(cat.update(&id, &patch).expect_err("bad rating").is_invalid_argument());
    }
    assert_eq!(cat.count(&WorkFilter::default()).expect("count"), 1);
    assert_eq!(fetch(&cat, &id).rating, None);
}

#[test]
fn malformed_progress_fails_create() {
    let (mut cat, _) = catalog();
    for bad in [
        Progress::new(0, 0),
        Progress::new(0, -10),
        Progress::new(-1, 10),
        Progress::new(11, 10),
    ] {
        let mut new = NewWork::new("Berserk", WorkType::Manga, WorkStatus::InProgress);
        new.progress = Some(bad);
        let err = cat.create(&new).expect_err("bad progress");
        assert!(err.is_invalid_argument(), "{bad} should be rejected");
    }
    assert_eq!(cat.count(&WorkFilter::default()).expect("count"), 0);
}

#[test]
fn overshooting_progress_update_keeps_stored_progress() {
    let (mut cat, _) = catalog();
    let mut new = NewWork::new("Dune", WorkType::Book, WorkStatus::InProgress);
    new.progress = Some(Progress::new(0, 320));
    let id = cat.create(&new).expect("create");
    let before = fetch(&cat, &id);

    let patch = WorkPatch {
        progress: Some(Some(Progress::new(400, 320))),
        ..WorkPatch::default()
    };
    let err = cat.update(&id, &patch).expect_err("overshoot");
    assert!(err.is_invalid_argument());

    let after = fetch(&cat, &id);
    assert_eq!(after.progress, Some(Progress::new(0, 320)));
    assert_eq!(after, before);
}

#[test]
fn degenerate_progress_update_is_rejected_and_leaves_row_alone() {
    let (mut cat, _) = catalog();
    let mut new = NewWork::new("Frieren", WorkType::Anime, WorkStatus::InProgress);
    new.progress = Some(Progress::new(3, 28));
    let id = cat.create(&new).expect("create");
    let before = fetch(&cat, &id);

    for bad in [Progress::new(0, 0), Progress::new(0, -10), Progress::new(-1, 10)] {
        let patch = WorkPatch {
            progress: Some(Some(bad)),
            ..WorkPatch::default()
        };
        let err = cat.update(&id, &patch).expect_err("degenerate progress");
        assert!(err.is_invalid_argument(), "{bad:?}");
        assert_eq!(fetch(&cat, &id), before, "{bad:?}");
    }
}

#[test]
fn update_unknown_id_is_not_found() {
    let (mut cat, _) = catalog();
    let err = cat
        .update(&WorkId::from_raw("wk-0000000000"), &status_patch(WorkStatus::Finished))
        .expect_err("missing");
    assert!(err.is_not_found());
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[test]
fn status_update_changes_only_status_and_updated_at() {
    let (mut cat, _) = catalog();
    let mut new = NewWork::new("Cowboy Bebop", WorkType::Anime, WorkStatus::InProgress);
    new.progress = Some(Progress::new(12, 26));
    new.tags = vec!["space".into()];
    new.creator = Some("Sunrise".into());
    new.rating = Some(5);
    let id = cat.create(&new).expect("create");
    let before = fetch(&cat, &id);

    let after = cat.update(&id, &status_patch(WorkStatus::Dropped)).expect("update");

    assert_eq!(after.status, WorkStatus::Dropped);
    assert!(after.updated_at > before.updated_at);
    let restored = Work {
        status: before.status,
        updated_at: before.updated_at,
        ..after
    };
    assert_eq!(restored, before);
}

#[test]
fn empty_patch_still_bumps_updated_at() {
    let (mut cat, _) = catalog();
    let id = add(&mut cat, "Arrival", WorkType::Movie, WorkStatus::Backlog);
    let before = fetch(&cat, &id);

    let after = cat.update(&id, &WorkPatch::default()).expect("update");
    assert!(after.updated_at > before.updated_at);
    assert_eq!(after.title, before.title);
}

#[test]
fn patch_can_clear_optional_fields() {
    let (mut cat, _) = catalog();
    let mut new = NewWork::new("Monster", WorkType::Manga, WorkStatus::InProgress);
    new.progress = Some(Progress::new(40, 162));
    new.notes = Some("## Arc notes".into());
    new.year = Some(1994);
    let id = cat.create(&new).expect("create");

    let patch = WorkPatch {
        progress: Some(None),
        notes: Some("  ".into()),
        year: Some(None),
        ..WorkPatch::default()
    };
    let work = cat.update(&id, &patch).expect("update");
    assert_eq!(work.progress, None);
    assert_eq!(work.notes, None);
    assert_eq!(work.year, None);
}

// ---------------------------------------------------------------------------
// Remove
// ---------------------------------------------------------------------------

#[test]
fn remove_twice_is_silent() {
    let (mut cat, _) = catalog();
    let id = add(&mut cat, "Solaris", WorkType::Movie, WorkStatus::Finished);

    assert!(cat.remove(&id).expect("first remove"));
    assert!(!cat.remove(&id).expect("second remove"));
    assert!(cat.get(&id).expect("get").is_none());
}

#[test]
fn remove_leaves_other_works_alone() {
    let (mut cat, _) = catalog();
    let keep = add(&mut cat, "Keep", WorkType::Book, WorkStatus::Backlog);
    let gone = add(&mut cat, "Gone", WorkType::Book, WorkStatus::Backlog);

    cat.remove(&gone).expect("remove");
    let remaining: Vec<WorkId> = cat
        .list(&WorkFilter::default(), None)
        .expect("list")
        .into_iter()
        .map(|w| w.id)
        .collect();
    assert_eq!(remaining, vec![keep]);
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[test]
fn list_by_status_returns_only_that_status_newest_first() {
    let (mut cat, _) = catalog();
    let a = add(&mut cat, "A", WorkType::Book, WorkStatus::Finished);
    add(&mut cat, "B", WorkType::Movie, WorkStatus::Backlog);
    let c = add(&mut cat, "C", WorkType::Anime, WorkStatus::InProgress);
    cat.update(&c, &status_patch(WorkStatus::Finished)).expect("update");

    let works = cat
        .list(&WorkFilter::status(WorkStatus::Finished), None)
        .expect("list");
    assert!(works.iter().all(|w| w.status == WorkStatus::Finished));
    let ids: Vec<&WorkId> = works.iter().map(|w| &w.id).collect();
    assert_eq!(ids, vec![&c, &a]);
    assert!(works.windows(2).all(|pair| pair[0].updated_at >= pair[1].updated_at));
}

#[test]
fn list_by_type_returns_only_that_type() {
    let (mut cat, _) = catalog();
    add(&mut cat, "Akira", WorkType::Manga, WorkStatus::Finished);
    add(&mut cat, "Heat", WorkType::Movie, WorkStatus::Finished);
    add(&mut cat, "Pluto", WorkType::Manga, WorkStatus::Backlog);

    let works = cat
        .list(&WorkFilter::work_type(WorkType::Manga), None)
        .expect("list");
    let titles: Vec<&str> = works.iter().map(|w| w.title.as_str()).collect();
    assert_eq!(titles, vec!["Pluto", "Akira"]);
}

#[test]
fn status_filter_shadows_type_filter() {
    let (mut cat, _) = catalog();
    add(&mut cat, "Book backlog", WorkType::Book, WorkStatus::Backlog);
    add(&mut cat, "Movie backlog", WorkType::Movie, WorkStatus::Backlog);
    add(&mut cat, "Book finished", WorkType::Book, WorkStatus::Finished);

    let filter = WorkFilter {
        status: Some(WorkStatus::Backlog),
        work_type: Some(WorkType::Book),
    };
    let works = cat.list(&filter, None).expect("list");
    let titles: Vec<&str> = works.iter().map(|w| w.title.as_str()).collect();
    assert_eq!(titles, vec!["Movie backlog", "Book backlog"]);
}

#[test]
fn limit_one_returns_most_recently_updated() {
    let (mut cat, _) = catalog();
    let first = add(&mut cat, "First", WorkType::Book, WorkStatus::Backlog);
    add(&mut cat, "Second", WorkType::Book, WorkStatus::Backlog);
    add(&mut cat, "Third", WorkType::Book, WorkStatus::Backlog);
    cat.update(&first, &status_patch(WorkStatus::InProgress))
        .expect("update");

    let works = cat.list(&WorkFilter::default(), Some(1)).expect("list");
    assert_eq!(works.len(), 1);
    assert_eq!(works[0].id, first);
}

#[test]
fn updated_at_never_precedes_created_at_under_clock_skew() {
    let (mut cat, clock) = catalog();
    let id = add(&mut cat, "Skewed", WorkType::Book, WorkStatus::Backlog);

    clock.set(0);
    let work = cat.update(&id, &status_patch(WorkStatus::Finished)).expect("update");
    assert!(work.updated_at >= work.created_at);
}
