use std::collections::HashMap;
use std::path::Path;

use rusqlite::{Connection, OptionalExtension};

use crate::error::Result;

/// The named collections the store knows about. One blob per collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Students,
    Teachers,
    Attendance,
    Tests,
    Notices,
    Payments,
}

impl Collection {
    pub const ALL: [Collection; 6] = [
        Collection::Students,
        Collection::Teachers,
        Collection::Attendance,
        Collection::Tests,
        Collection::Notices,
        Collection::Payments,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Collection::Students => "students",
            Collection::Teachers => "teachers",
            Collection::Attendance => "attendance",
            Collection::Tests => "tests",
            Collection::Notices => "notices",
            Collection::Payments => "payments",
        }
    }
}

/// Storage port. Pure key→blob persistence; no schema awareness, no partial
/// writes. Every mutation round-trips read → transform → write.
pub trait RecordStore {
    fn read(&self, collection: Collection) -> Result<Option<String>>;
    fn write(&mut self, collection: Collection, blob: &str) -> Result<()>;
}

/// In-memory backend for tests and scratch sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: HashMap<&'static str, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn read(&self, collection: Collection) -> Result<Option<String>> {
        Ok(self.blobs.get(collection.key()).cloned())
    }

    fn write(&mut self, collection: Collection, blob: &str) -> Result<()> {
        self.blobs.insert(collection.key(), blob.to_string());
        Ok(())
    }
}

/// Durable backend: one SQLite file with a single key/value table.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) a store under `workspace`.
    pub fn open(workspace: &Path) -> Result<Self> {
        std::fs::create_dir_all(workspace)?;
        let conn = Connection::open(workspace.join("schooldesk.sqlite3"))?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS collections(
                name TEXT PRIMARY KEY,
                data TEXT NOT NULL
            )",
            [],
        )?;
        Ok(Self { conn })
    }
}

impl RecordStore for SqliteStore {
    fn read(&self, collection: Collection) -> Result<Option<String>> {
        let blob = self
            .conn
            .query_row(
                "SELECT data FROM collections WHERE name = ?",
                [collection.key()],
                |r| r.get::<_, String>(0),
            )
            .optional()?;
        Ok(blob)
    }

    fn write(&mut self, collection: Collection, blob: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO collections(name, data)
             VALUES(?, ?)
             ON CONFLICT(name) DO UPDATE SET data = excluded.data",
            (collection.key(), blob),
        )?;
        Ok(())
    }
}
