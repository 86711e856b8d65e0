use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use td_core::period::{IntervalMode, Period};
use td_core::store::{StoreError, TaskStore};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("date")
}

fn store(temp: &TempDir, mode: IntervalMode) -> TaskStore {
    TaskStore::new(temp.path(), Period::new(mode, false), "test_template")
}

fn write_file(path: &PathBuf, content: &str) {
    fs::create_dir_all(path.parent().expect("parent")).expect("dirs");
    fs::write(path, content).expect("write");
}

#[test]
fn add_task_to_new_file_without_template() {
    let temp = TempDir::new().expect("tempdir");
    let store = store(&temp, IntervalMode::Daily);
    let day = date(2024, 8, 30);
    let path = store.add_task(day, "Buy milk").expect("add");
    assert_eq!(path, temp.path().join("2024").join("August").join("30"));
    assert_eq!(fs::read_to_string(path).expect("read"), "- [ ] Buy milk\n");
}

#[test]
fn add_task_seeds_from_template_without_header() {
    let temp = TempDir::new().expect("tempdir");
    let store = store(&temp, IntervalMode::Daily);
    fs::write(temp.path().join("test_template"), "Template content\n").expect("template");
    let day = date(2024, 8, 30);
    let path = store.add_task(day, "Test task").expect("add");
    assert_eq!(
        fs::read_to_string(path).expect("read"),
        "Template content\n- [ ] Test task\n"
    );
}

#[test]
fn add_task_appends_to_existing_file() {
    let temp = TempDir::new().expect("tempdir");
    let store = store(&temp, IntervalMode::Weekly);
    let day = date(2024, 8, 30);
    store.add_task(day, "one").expect("add");
    store.add_task(day, "two").expect("add");
    let path = store.file_path(day);
    assert!(path.ends_with("2024/August/week35"));
    assert_eq!(fs::read_to_string(path).expect("read"), "- [ ] one\n- [ ] two\n");
}

#[test]
fn add_task_keeps_unterminated_template_line_intact() {
    let temp = TempDir::new().expect("tempdir");
    let store = store(&temp, IntervalMode::Daily);
    fs::write(temp.path().join("test_template"), "- [ ] stretch").expect("template");
    let day = date(2024, 8, 30);
    let path = store.add_task(day, "Buy milk").expect("add");
    assert_eq!(
        fs::read_to_string(path).expect("read"),
        "- [ ] stretch\n- [ ] Buy milk\n"
    );
    let texts: Vec<String> = store
        .load_tasks(day)
        .expect("load")
        .into_iter()
        .map(|task| task.text)
        .collect();
    assert_eq!(texts, vec!["stretch", "Buy milk"]);
}

#[test]
fn add_task_terminates_hand_edited_last_line() {
    let temp = TempDir::new().expect("tempdir");
    let store = store(&temp, IntervalMode::Daily);
    let day = date(2024, 8, 30);
    write_file(&store.file_path(day), "- [x] done");
    store.add_task(day, "next").expect("add");
    assert_eq!(
        fs::read_to_string(store.file_path(day)).expect("read"),
        "- [x] done\n- [ ] next\n"
    );
}

#[test]
fn prepare_for_edit_terminates_unterminated_template() {
    let temp = TempDir::new().expect("tempdir");
    let store = store(&temp, IntervalMode::Weekly);
    fs::write(temp.path().join("test_template"), "- [ ] review").expect("template");
    let path = store.prepare_for_edit(date(2024, 8, 30)).expect("prepare");
    assert_eq!(fs::read_to_string(&path).expect("read"), "Week 35\n\n- [ ] review\n");
}

#[test]
fn toggle_only_changes_the_matching_line() {
    let temp = TempDir::new().expect("tempdir");
    let store = store(&temp, IntervalMode::Daily);
    let day = date(2024, 8, 30);
    let path = store.file_path(day);
    write_file(&path, "- [ ] Task 1\n- [ ] Task 2\n- [ ] Task 3\n");

    store.set_task_status(day, "Task 2", true).expect("update");
    assert_eq!(
        fs::read_to_string(&path).expect("read"),
        "- [ ] Task 1\n- [x] Task 2\n- [ ] Task 3\n"
    );

    store.set_task_status(day, "Task 2", false).expect("update");
    assert_eq!(
        fs::read_to_string(&path).expect("read"),
        "- [ ] Task 1\n- [ ] Task 2\n- [ ] Task 3\n"
    );
}

#[test]
fn set_task_status_is_idempotent() {
    let temp = TempDir::new().expect("tempdir");
    let store = store(&temp, IntervalMode::Daily);
    let day = date(2024, 8, 30);
    let path = store.file_path(day);
    write_file(&path, "header\n\n  - [ ] indented\n- [x] done\n");

    for checked in [true, false] {
        store.set_task_status(day, "indented", checked).expect("first");
        let once = fs::read_to_string(&path).expect("read");
        store.set_task_status(day, "indented", checked).expect("second");
        let twice = fs::read_to_string(&path).expect("read");
        assert_eq!(once, twice);
    }
    store.set_task_status(day, "done", true).expect("already checked");
    assert_eq!(
        fs::read_to_string(&path).expect("read"),
        "header\n\n  - [ ] indented\n- [x] done\n"
    );
}

#[test]
fn set_task_status_creates_missing_file_then_reports_not_found() {
    let temp = TempDir::new().expect("tempdir");
    let store = store(&temp, IntervalMode::Monthly);
    let day = date(2024, 8, 30);
    let err = store.set_task_status(day, "ghost", true);
    assert!(matches!(err, Err(StoreError::NotFound(_))));
    let path = store.file_path(day);
    assert!(path.ends_with("2024/August/August"));
    assert_eq!(fs::read_to_string(path).expect("read"), "");
}

#[test]
fn load_tasks_falls_back_to_template() {
    let temp = TempDir::new().expect("tempdir");
    let store = store(&temp, IntervalMode::Daily);
    let day = date(2024, 8, 30);
    assert!(store.load_tasks(day).expect("load").is_empty());

    fs::write(
        temp.path().join("test_template"),
        "Routine\n- [ ] stretch\n- [x] water plants\n",
    )
    .expect("template");
    let tasks = store.load_tasks(day).expect("load");
    let texts: Vec<&str> = tasks.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["stretch", "water plants"]);
    assert!(!store.file_path(day).exists());
}

#[test]
fn locate_line_ignores_markers_on_both_sides() {
    let temp = TempDir::new().expect("tempdir");
    let store = store(&temp, IntervalMode::Daily);
    let day = date(2024, 8, 30);
    write_file(
        &store.file_path(day),
        "2024-08-30 Friday\n\n- [ ] first\n- [x] second\n",
    );
    assert_eq!(store.locate_line(day, "first").expect("locate"), 3);
    assert_eq!(store.locate_line(day, "- [ ] second").expect("locate"), 4);
    assert_eq!(store.locate_line(day, "third").expect("locate"), 0);
    assert!(store.contains_task(day, "second").expect("contains"));
}

#[test]
fn locate_line_uses_template_when_file_missing() {
    let temp = TempDir::new().expect("tempdir");
    let store = store(&temp, IntervalMode::Daily);
    let day = date(2024, 8, 30);
    assert_eq!(store.locate_line(day, "stretch").expect("locate"), 0);
    fs::write(temp.path().join("test_template"), "Routine\n- [ ] stretch\n").expect("template");
    assert_eq!(store.locate_line(day, "stretch").expect("locate"), 2);
}

#[test]
fn copy_unchecked_carries_only_open_tasks() {
    let temp = TempDir::new().expect("tempdir");
    let store = store(&temp, IntervalMode::Daily);
    let yesterday = date(2024, 8, 29);
    let today = date(2024, 8, 30);
    store.add_task(yesterday, "A").expect("add");
    store.add_task(yesterday, "B").expect("add");
    store.add_task(yesterday, "C").expect("add");
    store.set_task_status(yesterday, "B", true).expect("check");

    let copied = store.copy_unchecked_from(yesterday, today).expect("copy");
    assert_eq!(copied, 2);
    assert_eq!(
        fs::read_to_string(store.file_path(today)).expect("read"),
        "- [ ] A\n- [ ] C\n"
    );
}

#[test]
fn seed_from_previous_only_fills_new_periods() {
    let temp = TempDir::new().expect("tempdir");
    let store = TaskStore::new(
        temp.path(),
        Period::new(IntervalMode::Daily, true),
        "test_template",
    );
    let friday = date(2024, 8, 30);
    let monday = date(2024, 9, 2);

    assert_eq!(store.seed_from_previous(monday).expect("seed"), 0);
    assert!(!store.file_path(monday).exists());

    store.add_task(friday, "carry me").expect("add");
    store.add_task(friday, "finished").expect("add");
    store.set_task_status(friday, "finished", true).expect("check");
    assert_eq!(store.seed_from_previous(monday).expect("seed"), 1);
    assert_eq!(
        fs::read_to_string(store.file_path(monday)).expect("read"),
        "- [ ] carry me\n"
    );

    assert_eq!(store.seed_from_previous(monday).expect("seed again"), 0);
}

#[test]
fn prepare_for_edit_prepends_header_to_template() {
    let temp = TempDir::new().expect("tempdir");
    let store = store(&temp, IntervalMode::Weekly);
    fs::write(temp.path().join("test_template"), "- [ ] review\n").expect("template");
    let day = date(2024, 8, 30);
    let path = store.prepare_for_edit(day).expect("prepare");
    assert_eq!(fs::read_to_string(&path).expect("read"), "Week 35\n\n- [ ] review\n");

    fs::write(&path, "edited\n").expect("edit");
    let again = store.prepare_for_edit(day).expect("prepare");
    assert_eq!(again, path);
    assert_eq!(fs::read_to_string(&path).expect("read"), "edited\n");
}

#[test]
fn ensure_vault_creates_root() {
    let temp = TempDir::new().expect("tempdir");
    let root = temp.path().join("nested").join("vault");
    let store = TaskStore::new(&root, Period::default(), ".template");
    store.ensure_vault().expect("ensure");
    assert!(root.is_dir());
}
