use bookstore_core::db::migrations::latest_version;
use bookstore_core::db::open_db_in_memory;
use bookstore_core::{
    BookPatch, BookRepository, BookService, NewBook, RepoError, SqliteBookRepository,
};
use rusqlite::Connection;

fn new_book(title: &str, author: &str) -> NewBook {
    NewBook::new(title, author).unwrap()
}

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let created = repo
        .create_book(&new_book("Start with Why", "Simon Sinek"))
        .unwrap();
    assert!(created.id > 0);
    assert_eq!(created.title, "Start with Why");
    assert_eq!(created.author, "Simon Sinek");

    let loaded = repo.get_book(created.id).unwrap();
    assert_eq!(loaded, created);
}

#[test]
fn create_assigns_distinct_ids() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let first = repo.create_book(&new_book("a", "x")).unwrap();
    let second = repo.create_book(&new_book("b", "y")).unwrap();

    assert_ne!(first.id, second.id);
}

#[test]
fn list_is_empty_then_counts_every_create() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    assert!(repo.list_books().unwrap().is_empty());

    for index in 0..3 {
        repo.create_book(&new_book(&format!("title {index}"), "author"))
            .unwrap();
    }

    let books = repo.list_books().unwrap();
    assert_eq!(books.len(), 3);
    assert!(books.windows(2).all(|pair| pair[0].id < pair[1].id));
}

#[test]
fn get_missing_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let err = repo.get_book(42).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(42)));
}

#[test]
fn partial_update_keeps_omitted_field() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let created = repo
        .create_book(&new_book("Start with Why", "Simon Sinek"))
        .unwrap();
    let patch = BookPatch::new(Some("The Infinite Game".to_string()), None);

    let updated = repo.update_book(created.id, &patch).unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.title, "The Infinite Game");
    assert_eq!(updated.author, "Simon Sinek");

    assert_eq!(repo.get_book(created.id).unwrap(), updated);
}

#[test]
fn empty_patch_returns_unmodified_record() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let created = repo.create_book(&new_book("Dune", "Frank Herbert")).unwrap();

    let updated = repo.update_book(created.id, &BookPatch::default()).unwrap();
    assert_eq!(updated, created);
}

#[test]
fn update_not_found_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let patch = BookPatch::new(Some("anything".to_string()), None);
    let err = repo.update_book(7, &patch).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(7)));
}

#[test]
fn delete_removes_row_and_repeats_report_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let created = repo.create_book(&new_book("Dune", "Frank Herbert")).unwrap();

    repo.delete_book(created.id).unwrap();
    assert!(matches!(
        repo.get_book(created.id).unwrap_err(),
        RepoError::NotFound(_)
    ));
    assert!(matches!(
        repo.delete_book(created.id).unwrap_err(),
        RepoError::NotFound(id) if id == created.id
    ));
}

#[test]
fn deleted_ids_are_not_reused() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let first = repo.create_book(&new_book("a", "x")).unwrap();
    repo.delete_book(first.id).unwrap();
    let second = repo.create_book(&new_book("b", "y")).unwrap();

    assert!(second.id > first.id);
}

#[test]
fn corrupt_row_surfaces_as_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO books (id, title, author) VALUES (5, '', 'nobody');",
        [],
    )
    .unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let err = repo.get_book(5).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn service_wraps_repository_calls() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();
    let service = BookService::new(repo);

    let created = service.create(&new_book("from service", "tester")).unwrap();
    assert_eq!(service.find_by_id(created.id).unwrap(), created);
    assert_eq!(service.find_all().unwrap(), vec![created.clone()]);

    let patch = BookPatch::new(None, Some("editor".to_string()));
    let updated = service.update(created.id, &patch).unwrap();
    assert_eq!(updated.author, "editor");

    assert!(service.delete(created.id).unwrap());
    assert!(matches!(
        service.delete(created.id).unwrap_err(),
        RepoError::NotFound(_)
    ));
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqliteBookRepository::try_new(&conn);
    match result {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_books_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteBookRepository::try_new(&conn);
    assert!(matches!(result, Err(RepoError::MissingRequiredTable("books"))));
}

#[test]
fn repository_rejects_connection_missing_author_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE books (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteBookRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "books",
            column: "author"
        })
    ));
}
