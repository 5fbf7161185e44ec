//! SQL schema for the barkeep SQLite store.
//!
//! Executed once at connection startup. There is no migration tooling; the
//! DDL only ever creates what is missing.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- ── Canonical schema ──────────────────────────────────────────────────────

CREATE TABLE IF NOT EXISTS glass_type (
    id    INTEGER PRIMARY KEY,
    name  TEXT NOT NULL UNIQUE     -- title-cased
);

CREATE TABLE IF NOT EXISTS ingredient (
    id    INTEGER PRIMARY KEY,
    name  TEXT NOT NULL UNIQUE     -- trimmed, case-sensitive
);

CREATE TABLE IF NOT EXISTS cocktail (
    id             INTEGER PRIMARY KEY,
    name           TEXT NOT NULL,
    source         TEXT NOT NULL,  -- 'the_cocktail_db' | 'boston_cocktails'
    category       TEXT,
    glass_type_id  INTEGER REFERENCES glass_type(id),
    description    TEXT,
    instructions   TEXT,
    UNIQUE (name, source)
);

CREATE TABLE IF NOT EXISTS cocktail_ingredient (
    cocktail_id       INTEGER NOT NULL REFERENCES cocktail(id) ON DELETE CASCADE,
    ingredient_id     INTEGER NOT NULL REFERENCES ingredient(id),
    quantity          TEXT,        -- free-form, never parsed
    ingredient_order  INTEGER,     -- NULL sorts last
    source_dataset    TEXT,
    PRIMARY KEY (cocktail_id, ingredient_id)
);

CREATE INDEX IF NOT EXISTS cocktail_name_idx ON cocktail(name);
CREATE INDEX IF NOT EXISTS cocktail_ingredient_ingredient_idx
    ON cocktail_ingredient(ingredient_id);

-- ── Staging (unconstrained, append-only) ──────────────────────────────────

CREATE TABLE IF NOT EXISTS the_cocktail_db (
    drink             TEXT,
    category          TEXT,
    glass             TEXT,
    instructions      TEXT,
    ingredient_order  INTEGER,
    ingredient        TEXT,
    measure           TEXT
);

CREATE TABLE IF NOT EXISTS boston_cocktails (
    name               TEXT,
    category           TEXT,
    ingredient_number  TEXT,
    ingredient         TEXT,
    measure            TEXT
);
";
