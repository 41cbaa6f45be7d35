use std::collections::HashSet;

use anyhow::Result;
use rusqlite::Connection;

use crate::analyze::LeadRecord;

const DB_PATH: &str = "data/leads.sqlite";

pub fn connect() -> Result<Connection> {
    if let Some(dir) = std::path::Path::new(DB_PATH).parent() {
        std::fs::create_dir_all(dir)?;
    }
    let conn = Connection::open(DB_PATH)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

#[cfg(test)]
pub fn connect_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS leads (
            id            INTEGER PRIMARY KEY,
            url           TEXT UNIQUE NOT NULL,
            email         TEXT,
            phone         TEXT,
            facebook      TEXT,
            instagram     TEXT,
            twitter       TEXT,
            linkedin      TEXT,
            youtube       TEXT,
            founder       TEXT,
            score         REAL NOT NULL,
            discovered_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE INDEX IF NOT EXISTS idx_leads_discovered ON leads(discovered_at);

        CREATE TABLE IF NOT EXISTS used_phrases (
            phrase  TEXT PRIMARY KEY,
            used_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        ",
    )?;
    Ok(())
}

// ── Leads ──

/// URLs already in the sink, for O(1) dedup before the pipeline runs.
pub fn existing_urls(conn: &Connection) -> Result<HashSet<String>> {
    let mut stmt = conn.prepare("SELECT url FROM leads")?;
    let urls = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<HashSet<_>, _>>()?;
    Ok(urls)
}

/// Append one lead. Returns false when the URL was already present.
pub fn insert_lead(conn: &Connection, lead: &LeadRecord, score: f64) -> Result<bool> {
    let mut stmt = conn.prepare_cached(
        "INSERT OR IGNORE INTO leads
         (url, email, phone, facebook, instagram, twitter, linkedin, youtube, founder, score)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
    )?;
    let changed = stmt.execute(rusqlite::params![
        lead.url,
        lead.email,
        lead.phone,
        lead.social("facebook"),
        lead.social("instagram"),
        lead.social("twitter"),
        lead.social("linkedin"),
        lead.social("youtube"),
        lead.founder,
        score,
    ])?;
    Ok(changed > 0)
}

pub struct LeadListRow {
    pub url: String,
    pub email: String,
    pub phone: String,
    pub instagram: String,
    pub score: f64,
    pub discovered_at: String,
}

pub fn fetch_leads(conn: &Connection, limit: usize) -> Result<Vec<LeadListRow>> {
    let sql = format!(
        "SELECT url, COALESCE(email,''), COALESCE(phone,''), COALESCE(instagram,''),
                score, discovered_at
         FROM leads
         ORDER BY discovered_at DESC, id DESC
         LIMIT {}",
        limit
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(LeadListRow {
                url: row.get(0)?,
                email: row.get(1)?,
                phone: row.get(2)?,
                instagram: row.get(3)?,
                score: row.get(4)?,
                discovered_at: row.get(5)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ── Phrase bookkeeping ──

pub fn used_phrases(conn: &Connection) -> Result<HashSet<String>> {
    let mut stmt = conn.prepare("SELECT phrase FROM used_phrases")?;
    let phrases = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<HashSet<_>, _>>()?;
    Ok(phrases)
}

pub fn mark_phrase_used(conn: &Connection, phrase: &str) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO used_phrases (phrase) VALUES (?1)",
        [phrase],
    )?;
    Ok(())
}

// ── Stats ──

pub struct Stats {
    pub leads: usize,
    pub with_email: usize,
    pub with_phone: usize,
    pub with_social: usize,
    pub phrases_used: usize,
}

pub fn get_stats(conn: &Connection) -> Result<Stats> {
    let leads: usize = conn.query_row("SELECT COUNT(*) FROM leads", [], |r| r.get(0))?;
    let with_email: usize = conn.query_row(
        "SELECT COUNT(*) FROM leads WHERE email IS NOT NULL",
        [],
        |r| r.get(0),
    )?;
    let with_phone: usize = conn.query_row(
        "SELECT COUNT(*) FROM leads WHERE phone IS NOT NULL",
        [],
        |r| r.get(0),
    )?;
    let with_social: usize = conn.query_row(
        "SELECT COUNT(*) FROM leads
         WHERE facebook IS NOT NULL OR instagram IS NOT NULL OR twitter IS NOT NULL
            OR linkedin IS NOT NULL OR youtube IS NOT NULL",
        [],
        |r| r.get(0),
    )?;
    let phrases_used: usize =
        conn.query_row("SELECT COUNT(*) FROM used_phrases", [], |r| r.get(0))?;
    Ok(Stats {
        leads,
        with_email,
        with_phone,
        with_social,
        phrases_used,
    })
}

// ── Tests ──
