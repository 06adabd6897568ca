use std::cell::RefCell;
use todolist_core::{RepoError, StoreError, Task, TaskList, TodoStore};

fn store() -> TodoStore {
    TodoStore::open_in_memory().unwrap()
}

fn saved_list(store: &TodoStore, title: &str, task_titles: &[&str]) -> TaskList {
    let mut list = store.save_new_list(title, |_| {}).unwrap();
    for task_title in task_titles {
        store.save_task(&Task::new(*task_title), &mut list).unwrap();
    }
    list
}

#[test]
fn groceries_scenario_roundtrips_and_cascades() {
    let store = store();

    let mut groceries = store.save_new_list("Groceries", |_| {}).unwrap();
    store
        .save_task(&Task::new("Milk").with_note("2%"), &mut groceries)
        .unwrap();
    store.save_task(&Task::new("Eggs"), &mut groceries).unwrap();

    let lists = store.fetch_all::<TaskList>().snapshot().unwrap();
    assert_eq!(lists.len(), 1);
    assert_eq!(lists[0].title, "Groceries");
    let titles: Vec<_> = lists[0].tasks.iter().map(|task| task.title.as_str()).collect();
    assert_eq!(titles, vec!["Milk", "Eggs"]);
    assert_eq!(lists[0].tasks[0].note, "2%");
    assert_eq!(lists[0], groceries);

    store.delete(groceries).unwrap();

    let remaining = store.fetch_all::<Task>().snapshot().unwrap();
    assert!(remaining
        .iter()
        .all(|task| task.title != "Milk" && task.title != "Eggs"));
    assert!(store.fetch_all::<TaskList>().is_empty().unwrap());
}

#[test]
fn delete_list_leaves_other_lists_tasks_alone() {
    let store = store();
    let doomed = saved_list(&store, "Doomed", &["a", "b"]);
    let kept = saved_list(&store, "Kept", &["c"]);

    store.delete(doomed).unwrap();

    let tasks = store.fetch_all::<Task>().snapshot().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].uuid, kept.tasks[0].uuid);
}

#[test]
fn delete_task_removes_only_that_task() {
    let store = store();
    let list = saved_list(&store, "Chores", &["Dishes", "Trash"]);

    store.delete(list.tasks[0].clone()).unwrap();

    let reloaded = store.find_list(list.uuid).unwrap().unwrap();
    assert_eq!(reloaded.tasks.len(), 1);
    assert_eq!(reloaded.tasks[0].title, "Trash");
}

#[test]
fn saved_tasks_keep_append_order() {
    let store = store();
    let titles = ["one", "two", "three", "four"];
    let list = saved_list(&store, "Ordered", &titles);

    let reloaded = store.find_list(list.uuid).unwrap().unwrap();
    let ids: Vec<_> = reloaded.tasks.iter().map(|task| task.uuid).collect();
    let expected: Vec<_> = list.tasks.iter().map(|task| task.uuid).collect();
    assert_eq!(ids, expected);

    let all_titles: Vec<_> = store
        .fetch_all::<Task>()
        .snapshot()
        .unwrap()
        .into_iter()
        .map(|task| task.title)
        .collect();
    assert_eq!(all_titles, titles);
}

#[test]
fn toggle_done_on_list_sets_every_task_complete() {
    let store = store();
    let mut list = saved_list(&store, "Mixed", &["done already", "open", "also open"]);
    let mut first = list.tasks[0].clone();
    store.toggle_done(&mut first).unwrap();
    assert!(first.is_complete);

    store.toggle_done(&mut list).unwrap();
    assert!(list.tasks.iter().all(|task| task.is_complete));

    // Bulk set, not bulk flip: a second pass keeps everything complete.
    store.toggle_done(&mut list).unwrap();
    let reloaded = store.find_list(list.uuid).unwrap().unwrap();
    assert_eq!(reloaded.tasks.len(), 3);
    assert!(reloaded.tasks.iter().all(|task| task.is_complete));
}

#[test]
fn toggle_done_on_task_twice_restores_original_state() {
    let store = store();
    let list = saved_list(&store, "Flip", &["task"]);
    let mut task = list.tasks[0].clone();

    store.toggle_done(&mut task).unwrap();
    assert!(task.is_complete);
    store.toggle_done(&mut task).unwrap();
    assert!(!task.is_complete);
    assert!(!store.find_task(task.uuid).unwrap().unwrap().is_complete);
}

#[test]
fn edit_list_changes_title_only() {
    let store = store();
    let mut list = saved_list(&store, "Old", &["keep me"]);

    store.edit(&mut list, "X", Some("ignored")).unwrap();

    let reloaded = store.find_list(list.uuid).unwrap().unwrap();
    assert_eq!(reloaded.title, "X");
    assert_eq!(reloaded.tasks[0].title, "keep me");
    assert_eq!(list, reloaded);
}

#[test]
fn edit_task_replaces_title_and_note() {
    let store = store();
    let list = saved_list(&store, "Notes", &["draft"]);
    let mut task = list.tasks[0].clone();

    store.edit(&mut task, "X", Some("Y")).unwrap();
    let reloaded = store.find_task(task.uuid).unwrap().unwrap();
    assert_eq!((reloaded.title.as_str(), reloaded.note.as_str()), ("X", "Y"));

    store.edit(&mut task, "Z", None).unwrap();
    let reloaded = store.find_task(task.uuid).unwrap().unwrap();
    assert_eq!(reloaded.title, "Z");
    assert_eq!(reloaded.note, "");
    assert_eq!(task, reloaded);
}

#[test]
fn live_results_reflect_later_writes() {
    let store = store();
    let lists = store.fetch_all::<TaskList>();
    let tasks = store.fetch_all::<Task>();
    assert_eq!(lists.len().unwrap(), 0);

    let mut list = store.save_new_list("Live", |_| {}).unwrap();
    store.save_task(&Task::new("appears"), &mut list).unwrap();

    assert_eq!(lists.len().unwrap(), 1);
    assert_eq!(tasks.get(0).unwrap().unwrap().title, "appears");
    assert!(tasks.get(1).unwrap().is_none());
}

#[test]
fn save_new_list_hands_durable_list_to_completion() {
    let store = store();
    let seen = RefCell::new(None);

    let list = store
        .save_new_list("Trip", |created| {
            let durable = store.find_list(created.uuid).unwrap();
            *seen.borrow_mut() = durable;
        })
        .unwrap();

    let seen = seen.into_inner().expect("completion should see the stored list");
    assert_eq!(seen, list);
    assert_eq!(list.title, "Trip");
    assert!(list.tasks.is_empty());
}

#[test]
fn save_lists_persists_batch_with_tasks() {
    let store = store();
    let mut first = TaskList::new("First");
    first.tasks.push(Task::new("inside first"));
    let second = TaskList::new("Second");

    store.save_lists(&[first.clone(), second.clone()]).unwrap();

    let lists = store.fetch_all::<TaskList>().snapshot().unwrap();
    assert_eq!(lists, vec![first, second]);
}

#[test]
fn failed_batch_write_rolls_back_everything() {
    let store = store();
    let existing = saved_list(&store, "Existing", &[]);
    let fresh = TaskList::new("Fresh");

    let err = store.save_lists(&[fresh.clone(), existing.clone()]).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Repo(RepoError::DuplicateRecord(id)) if id == existing.uuid
    ));

    assert!(store.find_list(fresh.uuid).unwrap().is_none());
    assert_eq!(store.fetch_all::<TaskList>().len().unwrap(), 1);
}

#[test]
fn failed_write_keeps_caller_snapshot_unchanged() {
    let store = store();
    let list = saved_list(&store, "Gone soon", &["task"]);
    let mut stale = list.clone();
    let mut stale_task = list.tasks[0].clone();
    store.delete(list).unwrap();

    assert!(store.edit(&mut stale, "Renamed", None).is_err());
    assert_eq!(stale.title, "Gone soon");

    assert!(store.toggle_done(&mut stale_task).is_err());
    assert!(!stale_task.is_complete);

    let err = store.save_task(&Task::new("late"), &mut stale).unwrap_err();
    assert!(matches!(err, StoreError::Repo(RepoError::ListNotFound(_))));
    assert_eq!(stale.tasks.len(), 1);
    assert!(store.fetch_all::<Task>().is_empty().unwrap());
}

#[test]
fn task_cannot_be_saved_into_two_lists() {
    let store = store();
    let mut home = saved_list(&store, "Home", &[]);
    let mut work = saved_list(&store, "Work", &[]);
    let task = Task::new("Shared?");

    store.save_task(&task, &mut home).unwrap();
    let err = store.save_task(&task, &mut work).unwrap_err();

    assert!(matches!(err, StoreError::Repo(RepoError::DuplicateRecord(_))));
    assert!(work.tasks.is_empty());
    assert_eq!(store.fetch_all::<Task>().len().unwrap(), 1);
}

#[test]
fn file_backed_store_persists_across_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todo.sqlite3");

    let list_id = {
        let store = TodoStore::open(&path).unwrap();
        saved_list(&store, "Durable", &["survives restart"]).uuid
    };

    let reopened = TodoStore::open(&path).unwrap();
    let list = reopened.find_list(list_id).unwrap().unwrap();
    assert_eq!(list.title, "Durable");
    assert_eq!(list.tasks[0].title, "survives restart");
}

#[test]
fn from_connection_rejects_unmigrated_connection() {
    let conn = rusqlite::Connection::open_in_memory().unwrap();

    match TodoStore::from_connection(conn) {
        Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}
