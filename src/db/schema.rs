//! SQL for the `xkcd_comics` table.
//! Each backend gets its own DDL and statements; placeholders differ.

/// Postgres schema: one row per comic, keyed by the upstream comic number.
pub const POSTGRES_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS xkcd_comics (
    comic_id INTEGER PRIMARY KEY,
    title VARCHAR(255) NOT NULL,
    img_url VARCHAR(500) NOT NULL,
    alt_text TEXT,
    date_published DATE NOT NULL
);
"#;

/// SQLite schema; `date_published` is stored as ISO-8601 text.
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS xkcd_comics (
    comic_id INTEGER PRIMARY KEY NOT NULL,
    title TEXT NOT NULL,
    img_url TEXT NOT NULL,
    alt_text TEXT NULL,
    date_published TEXT NOT NULL -- YYYY-MM-DD
);
"#;

pub(crate) const SELECT_MAX_COMIC_ID: &str = "SELECT MAX(comic_id) FROM xkcd_comics";

pub(crate) const POSTGRES_INSERT_COMIC: &str = r#"
INSERT INTO xkcd_comics (comic_id, title, img_url, alt_text, date_published)
VALUES ($1, $2, $3, $4, $5)
ON CONFLICT (comic_id) DO NOTHING
"#;

pub(crate) const SQLITE_INSERT_COMIC: &str = r#"
INSERT INTO xkcd_comics (comic_id, title, img_url, alt_text, date_published)
VALUES (?, ?, ?, ?, ?)
ON CONFLICT(comic_id) DO NOTHING
"#;

/// Splits a DDL script into executable statements (no `;` inside comments).
pub(crate) fn statements(script: &str) -> impl Iterator<Item = &str> {
    script.split(';').map(str::trim).filter(|s| !s.is_empty())
}
