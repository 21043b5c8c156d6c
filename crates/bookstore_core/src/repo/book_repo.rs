//! Book repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over canonical `books` storage.
//! - Keep SQL details inside core persistence boundary.
//!
//! # Invariants
//! - Write paths validate input before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Zero matching rows is reported as `RepoError::NotFound`, never as a crash.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::book::{Book, BookId, BookPatch, BookValidationError, NewBook};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const BOOK_SELECT_SQL: &str = "SELECT
    id,
    title,
    author
FROM books";

const BOOKS_TABLE: &str = "books";
const BOOKS_REQUIRED_COLUMNS: &[&str] = &["id", "title", "author"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for book persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(BookValidationError),
    Db(DbError),
    NotFound(BookId),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "book not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted book data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it through db::open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<BookValidationError> for RepoError {
    fn from(value: BookValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for book CRUD operations.
pub trait BookRepository {
    /// Returns every stored book ordered by id; an empty store yields `[]`.
    fn list_books(&self) -> RepoResult<Vec<Book>>;
    /// Exact-match lookup by id.
    fn get_book(&self, id: BookId) -> RepoResult<Book>;
    /// Inserts a new row and returns the persisted record with its assigned id.
    fn create_book(&self, new_book: &NewBook) -> RepoResult<Book>;
    /// Merges `patch` over the stored record and returns the result.
    fn update_book(&self, id: BookId, patch: &BookPatch) -> RepoResult<Book>;
    /// Permanently removes the row.
    fn delete_book(&self, id: BookId) -> RepoResult<()>;
}

/// SQLite-backed book repository.
pub struct SqliteBookRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBookRepository<'conn> {
    /// Wraps a connection that is already known to be migrated.
    ///
    /// Prefer `try_new` unless the connection was checked earlier.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Wraps a connection after checking it carries the expected schema.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema
    ///   does not match what the queries need.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let actual_version = current_user_version(conn)?;
        let expected_version = latest_version();
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        ensure_books_schema(conn)?;
        Ok(Self { conn })
    }
}

impl BookRepository for SqliteBookRepository<'_> {
    fn list_books(&self) -> RepoResult<Vec<Book>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BOOK_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut books = Vec::new();

        while let Some(row) = rows.next()? {
            books.push(parse_book_row(row)?);
        }

        Ok(books)
    }

    fn get_book(&self, id: BookId) -> RepoResult<Book> {
        select_book(self.conn, id)?.ok_or(RepoError::NotFound(id))
    }

    fn create_book(&self, new_book: &NewBook) -> RepoResult<Book> {
        new_book.validate()?;

        self.conn.execute(
            "INSERT INTO books (title, author) VALUES (?1, ?2);",
            params![new_book.title(), new_book.author()],
        )?;

        Ok(Book {
            id: self.conn.last_insert_rowid(),
            title: new_book.title().to_string(),
            author: new_book.author().to_string(),
        })
    }

    fn update_book(&self, id: BookId, patch: &BookPatch) -> RepoResult<Book> {
        let tx = self.conn.unchecked_transaction()?;
        let mut book = select_book(&tx, id)?.ok_or(RepoError::NotFound(id))?;

        if !patch.is_empty() {
            book.apply_patch(patch);
            book.validate()?;
            tx.execute(
                "UPDATE books
                 SET
                    title = ?1,
                    author = ?2
                 WHERE id = ?3;",
                params![book.title.as_str(), book.author.as_str(), id],
            )?;
        }

        tx.commit()?;
        Ok(book)
    }

    fn delete_book(&self, id: BookId) -> RepoResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        if select_book(&tx, id)?.is_none() {
            return Err(RepoError::NotFound(id));
        }

        tx.execute("DELETE FROM books WHERE id = ?1;", [id])?;
        tx.commit()?;
        Ok(())
    }
}

fn select_book(conn: &Connection, id: BookId) -> RepoResult<Option<Book>> {
    let mut stmt = conn.prepare(&format!("{BOOK_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_book_row(row)?));
    }

    Ok(None)
}

fn parse_book_row(row: &Row<'_>) -> RepoResult<Book> {
    let book = Book {
        id: row.get("id")?,
        title: row.get("title")?,
        author: row.get("author")?,
    };
    book.validate().map_err(|err| {
        RepoError::InvalidData(format!("row id={} in {BOOKS_TABLE}: {err}", book.id))
    })?;
    Ok(book)
}

fn ensure_books_schema(conn: &Connection) -> RepoResult<()> {
    let table_exists: bool = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [BOOKS_TABLE],
        |row| row.get(0),
    )?;
    if !table_exists {
        return Err(RepoError::MissingRequiredTable(BOOKS_TABLE));
    }

    let mut stmt = conn.prepare(&format!("PRAGMA table_info({BOOKS_TABLE});"))?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>("name"))?
        .collect::<Result<Vec<_>, _>>()?;

    for required in BOOKS_REQUIRED_COLUMNS {
        if !columns.iter().any(|column| column == required) {
            return Err(RepoError::MissingRequiredColumn {
                table: BOOKS_TABLE,
                column: *required,
            });
        }
    }

    Ok(())
}
