//! SQLite graph store implementation
//!
//! This module provides a SQLite-based implementation of the GraphStore trait.

use crate::model::{Domain, Page};
use crate::storage::schema::{initialize_schema, reset_schema};
use crate::storage::traits::{GraphStore, StorageError, StorageResult};
use crate::storage::PageRecord;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// SQLite graph store backend
///
/// The connection sits behind a mutex so the store can be shared by all
/// spiders; each write is a single transaction.
pub struct SqliteGraphStore {
    conn: Mutex<Connection>,
}

impl SqliteGraphStore {
    /// Opens (or creates) the database at `path` and installs the schema
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteGraphStore)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn open(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        // Configure SQLite for concurrent writers
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates an in-memory database
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StorageError::Database("connection lock poisoned".to_string()))
    }

    fn count(&self, sql: &str) -> StorageResult<u64> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(sql, [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn query_urls(&self, sql: &str, param: &str) -> StorageResult<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql)?;
        let urls = stmt
            .query_map(params![param], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(urls)
    }
}

impl GraphStore for SqliteGraphStore {
    fn reset(&self) -> StorageResult<()> {
        let conn = self.lock()?;
        reset_schema(&conn)?;
        tracing::debug!("Graph store reset");
        Ok(())
    }

    fn upsert_page(&self, page: &Page) -> StorageResult<i64> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let domain_id = match &page.domain {
            Some(domain) => Some(find_or_create_domain(&tx, &domain.name)?),
            None => None,
        };
        let time_found = page.time_found.to_rfc3339();
        let time_crawled = page.time_crawled.map(|t| t.to_rfc3339());

        let page_id = match find_page_id(&tx, &page.url)? {
            Some(id) => {
                tx.execute(
                    "UPDATE pages SET domain_id = ?1, title = ?2, summary = ?3, is_crawled = ?4,
                     depth = ?5, time_found = ?6, time_crawled = ?7 WHERE id = ?8",
                    params![
                        domain_id,
                        page.title,
                        page.summary,
                        page.is_crawled,
                        page.depth,
                        time_found,
                        time_crawled,
                        id
                    ],
                )?;
                id
            }
            None => {
                tx.execute(
                    "INSERT INTO pages (url, domain_id, title, summary, is_crawled, depth, time_found, time_crawled)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                    params![
                        page.url,
                        domain_id,
                        page.title,
                        page.summary,
                        page.is_crawled,
                        page.depth,
                        time_found,
                        time_crawled
                    ],
                )?;
                tx.last_insert_rowid()
            }
        };

        tx.execute("DELETE FROM page_keywords WHERE page_id = ?1", params![page_id])?;
        for (position, keyword) in page.keywords.iter().enumerate() {
            tx.execute(
                "INSERT INTO page_keywords (page_id, position, keyword) VALUES (?1, ?2, ?3)",
                params![page_id, position as i64, keyword],
            )?;
        }

        tx.execute("DELETE FROM page_text WHERE rowid = ?1", params![page_id])?;
        tx.execute(
            "INSERT INTO page_text (rowid, summary, keywords) VALUES (?1, ?2, ?3)",
            params![page_id, page.summary, page.keywords.join(" ")],
        )?;

        for related in page.related_pages.values() {
            let related_id = match find_page_id(&tx, &related.url)? {
                Some(id) => id,
                None => insert_found_page(&tx, related)?,
            };
            tx.execute(
                "INSERT OR IGNORE INTO related_pages (from_page_id, to_page_id) VALUES (?1, ?2)",
                params![page_id, related_id],
            )?;
        }

        tx.commit()?;
        Ok(page_id)
    }

    fn get_page(&self, url: &str) -> StorageResult<Option<PageRecord>> {
        let conn = self.lock()?;

        let row = conn
            .query_row(
                "SELECT p.id, p.url, d.name, p.title, p.summary, p.is_crawled, p.depth,
                        p.time_found, p.time_crawled
                 FROM pages p LEFT JOIN domains d ON d.id = p.domain_id
                 WHERE p.url = ?1",
                params![url],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, Option<String>>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, bool>(5)?,
                        row.get::<_, u32>(6)?,
                        row.get::<_, String>(7)?,
                        row.get::<_, Option<String>>(8)?,
                    ))
                },
            )
            .optional()?;

        let Some((id, url, domain, title, summary, is_crawled, depth, time_found, time_crawled)) =
            row
        else {
            return Ok(None);
        };

        let mut stmt =
            conn.prepare("SELECT keyword FROM page_keywords WHERE page_id = ?1 ORDER BY position")?;
        let keywords = stmt
            .query_map(params![id], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;

        Ok(Some(PageRecord {
            id,
            url,
            domain,
            title,
            summary,
            keywords,
            is_crawled,
            depth,
            time_found: parse_timestamp(&time_found)?,
            time_crawled: time_crawled.as_deref().map(parse_timestamp).transpose()?,
        }))
    }

    fn related_urls(&self, url: &str) -> StorageResult<Vec<String>> {
        self.query_urls(
            "SELECT t.url FROM related_pages r
             JOIN pages f ON f.id = r.from_page_id
             JOIN pages t ON t.id = r.to_page_id
             WHERE f.url = ?1 ORDER BY r.id",
            url,
        )
    }

    fn pages_in_domain(&self, domain: &str) -> StorageResult<Vec<String>> {
        self.query_urls(
            "SELECT p.url FROM pages p JOIN domains d ON d.id = p.domain_id
             WHERE d.name = ?1 ORDER BY p.url",
            domain,
        )
    }

    fn search(&self, query: &str) -> StorageResult<Vec<String>> {
        self.query_urls(
            "SELECT url FROM pages
             WHERE id IN (SELECT rowid FROM page_text WHERE page_text MATCH ?1)
             ORDER BY url",
            query,
        )
    }

    fn count_pages(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM pages")
    }

    fn count_crawled_pages(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM pages WHERE is_crawled = 1")
    }

    fn count_domains(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM domains")
    }

    fn count_links(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM related_pages")
    }
}

fn find_page_id(tx: &Transaction<'_>, url: &str) -> StorageResult<Option<i64>> {
    let id = tx
        .query_row("SELECT id FROM pages WHERE url = ?1", params![url], |row| {
            row.get(0)
        })
        .optional()?;
    Ok(id)
}

fn find_or_create_domain(tx: &Transaction<'_>, name: &str) -> StorageResult<i64> {
    tx.execute(
        "INSERT OR IGNORE INTO domains (name) VALUES (?1)",
        params![name],
    )?;
    let id = tx.query_row(
        "SELECT id FROM domains WHERE name = ?1",
        params![name],
        |row| row.get(0),
    )?;
    Ok(id)
}

/// Inserts a related page as an uncrawled node
fn insert_found_page(tx: &Transaction<'_>, page: &Page) -> StorageResult<i64> {
    let domain = page.domain.clone().or_else(|| Domain::of_url(&page.url));
    let domain_id = match domain {
        Some(domain) => Some(find_or_create_domain(tx, &domain.name)?),
        None => None,
    };

    tx.execute(
        "INSERT INTO pages (url, domain_id, is_crawled, depth, time_found) VALUES (?1, ?2, 0, ?3, ?4)",
        params![page.url, domain_id, page.depth, page.time_found.to_rfc3339()],
    )?;
    Ok(tx.last_insert_rowid())
}

fn parse_timestamp(value: &str) -> StorageResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| StorageError::InvalidTimestamp {
            value: value.to_string(),
            message: e.to_string(),
        })
}
