use std::path::Path;

use chrono::Local;
use rusqlite::Connection;

use crate::error::Result;

// Cascades are declared on the link tables and on accounts/transactions, but
// get_connection never turns PRAGMA foreign_keys on, so none of them fire.
// Deletes orphan dependent rows; tests pin that behavior down.
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY,
    username TEXT,
    password TEXT
);

CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY,
    name TEXT
);

CREATE TABLE IF NOT EXISTS accounts (
    id INTEGER PRIMARY KEY,
    user_id INTEGER,
    name TEXT,
    balance REAL,
    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS transaction_types (
    id INTEGER PRIMARY KEY,
    name TEXT
);

CREATE TABLE IF NOT EXISTS transactions (
    id INTEGER PRIMARY KEY,
    amount REAL,
    category_id INTEGER,
    description TEXT,
    date TEXT,
    account_id INTEGER,
    FOREIGN KEY (category_id) REFERENCES categories(id),
    FOREIGN KEY (account_id) REFERENCES accounts(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS transaction_type_mapping (
    transaction_id INTEGER,
    type_id INTEGER,
    FOREIGN KEY (transaction_id) REFERENCES transactions(id) ON DELETE CASCADE,
    FOREIGN KEY (type_id) REFERENCES transaction_types(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS transaction_tags (
    transaction_id INTEGER,
    tag TEXT,
    FOREIGN KEY (transaction_id) REFERENCES transactions(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS budget (
    id INTEGER PRIMARY KEY,
    category_id INTEGER,
    amount REAL,
    FOREIGN KEY (category_id) REFERENCES categories(id)
);
";

const DEFAULT_CATEGORIES: &[&str] = &[
    "Groceries",
    "Transport",
    "Housing",
    "Utilities",
    "Entertainment",
    "Salary",
    "Freelance",
    "Investments",
];

const DEFAULT_TYPES: &[&str] = &["Expense", "Income"];

// (username, password) — plain text, same as every other credential here
const DEFAULT_USERS: &[(&str, &str)] = &[("user1", "password1"), ("user2", "password2")];

// (user_id, name, balance)
const DEFAULT_ACCOUNTS: &[(i64, &str, f64)] = &[
    (1, "user1 checking", 1500.00),
    (2, "user2 checking", 2500.00),
];

// (category_id, amount)
const DEFAULT_BUDGETS: &[(i64, f64)] = &[(1, 500.00), (2, 300.00)];

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    Ok(conn)
}

/// Creates the eight tables and seeds placeholder rows into each table that
/// is still empty. Safe to call on every startup.
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;

    if table_empty(conn, "categories")? {
        for name in DEFAULT_CATEGORIES {
            conn.execute("INSERT INTO categories (name) VALUES (?1)", [name])?;
        }
    }

    if table_empty(conn, "transaction_types")? {
        for name in DEFAULT_TYPES {
            conn.execute("INSERT INTO transaction_types (name) VALUES (?1)", [name])?;
        }
    }

    if table_empty(conn, "users")? {
        for (username, password) in DEFAULT_USERS {
            conn.execute(
                "INSERT INTO users (username, password) VALUES (?1, ?2)",
                [username, password],
            )?;
        }
    }

    if table_empty(conn, "accounts")? {
        for (user_id, name, balance) in DEFAULT_ACCOUNTS {
            conn.execute(
                "INSERT INTO accounts (user_id, name, balance) VALUES (?1, ?2, ?3)",
                rusqlite::params![user_id, name, balance],
            )?;
        }
    }

    if table_empty(conn, "transactions")? {
        let today = Local::now().date_naive().format("%Y-%m-%d").to_string();
        // Groceries (1) and Salary (6) out of the seeded category list
        conn.execute(
            "INSERT INTO transactions (amount, category_id, description, date, account_id) \
             VALUES (200.00, 1, 'Grocery run', ?1, 1)",
            [&today],
        )?;
        conn.execute(
            "INSERT INTO transactions (amount, category_id, description, date, account_id) \
             VALUES (1500.00, 6, 'Monthly salary', ?1, 1)",
            [&today],
        )?;
    }

    if table_empty(conn, "budget")? {
        for (category_id, amount) in DEFAULT_BUDGETS {
            conn.execute(
                "INSERT INTO budget (category_id, amount) VALUES (?1, ?2)",
                rusqlite::params![category_id, amount],
            )?;
        }
    }

    Ok(())
}

fn table_empty(conn: &Connection, table: &str) -> Result<bool> {
    // Table names come from the callers above, never from input.
    let count: i64 = conn.query_row(&format!("SELECT count(*) FROM {table}"), [], |row| {
        row.get(0)
    })?;
    Ok(count == 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }

    #[test]
    fn test_init_db_creates_tables() {
        let (_dir, conn) = test_db();
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();
        for expected in &[
            "users",
            "accounts",
            "categories",
            "transaction_types",
            "transactions",
            "transaction_type_mapping",
            "transaction_tags",
            "budget",
        ] {
            assert!(tables.contains(&expected.to_string()), "missing table: {expected}");
        }
    }

    #[test]
    fn test_init_db_is_idempotent() {
        let (_dir, conn) = test_db();
        init_db(&conn).unwrap();
        let count: i64 = conn
            .query_row("SELECT count(*) FROM categories", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 8, "re-running init must not duplicate seed rows");
    }

    #[test]
    fn test_init_db_seeds_placeholders() {
        let (_dir, conn) = test_db();
        let categories: i64 = conn
            .query_row("SELECT count(*) FROM categories", [], |r| r.get(0))
            .unwrap();
        let types: i64 = conn
            .query_row("SELECT count(*) FROM transaction_types", [], |r| r.get(0))
            .unwrap();
        let users: i64 = conn
            .query_row("SELECT count(*) FROM users", [], |r| r.get(0))
            .unwrap();
        let budgets: i64 = conn
            .query_row("SELECT count(*) FROM budget", [], |r| r.get(0))
            .unwrap();
        assert_eq!(categories, 8);
        assert_eq!(types, 2);
        assert_eq!(users, 2);
        assert_eq!(budgets, 2);
    }

    #[test]
    fn test_seed_transactions_dated_today() {
        let (_dir, conn) = test_db();
        let today = Local::now().date_naive().format("%Y-%m-%d").to_string();
        let count: i64 = conn
            .query_row(
                "SELECT count(*) FROM transactions WHERE date = ?1",
                [&today],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_foreign_keys_pragma_stays_off() {
        let (_dir, conn) = test_db();
        let enabled: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |r| r.get(0))
            .unwrap();
        assert_eq!(enabled, 0, "declared cascades must stay dormant");
    }
}
