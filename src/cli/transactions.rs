use chrono::NaiveDate;
use colored::Colorize;
use comfy_table::{Cell, Table};
use rusqlite::Connection;

use crate::cli::categories::category_id_by_name;
use crate::cli::types::type_id_by_name;
use crate::db::get_connection;
use crate::error::{Result, TallyError};
use crate::fmt::money;
use crate::models::{RegisterRow, Transaction, TransactionTag, TypeMapping};
use crate::settings::db_path;

pub struct NewTransaction<'a> {
    pub amount: f64,
    pub category: &'a str,
    pub description: &'a str,
    /// Entry format DD/MM/YYYY; stored as YYYY-MM-DD.
    pub date: &'a str,
    pub account: Option<&'a str>,
    pub txn_type: Option<&'a str>,
    /// Comma-separated; empty segments are skipped.
    pub tags: Option<&'a str>,
}

pub fn add(new: NewTransaction) -> Result<()> {
    let conn = get_connection(&db_path())?;
    add_transaction(&conn, &new)?;
    println!(
        "{} {} {}",
        "Added transaction:".green(),
        money(new.amount),
        new.description
    );
    Ok(())
}

pub fn list() -> Result<()> {
    let conn = get_connection(&db_path())?;
    let rows = list_register(&conn)?;

    let mut table = Table::new();
    table.set_header(vec!["ID", "Date", "Amount", "Category", "Description"]);
    for row in rows {
        table.add_row(vec![
            Cell::new(row.id),
            Cell::new(row.date),
            Cell::new(money(row.amount)),
            Cell::new(row.category),
            Cell::new(row.description),
        ]);
    }
    println!("Transactions\n{table}");
    Ok(())
}

pub fn delete(id: i64) -> Result<()> {
    let conn = get_connection(&db_path())?;
    delete_transaction(&conn, id)?;
    println!("Deleted transaction {id}");
    Ok(())
}

pub fn tags() -> Result<()> {
    let conn = get_connection(&db_path())?;
    let tags = list_tags(&conn)?;

    let mut table = Table::new();
    table.set_header(vec!["Transaction", "Tag"]);
    for tag in tags {
        table.add_row(vec![Cell::new(tag.transaction_id), Cell::new(tag.tag)]);
    }
    println!("Tags\n{table}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Data layer
// ---------------------------------------------------------------------------

/// Parse a DD/MM/YYYY entry date into the stored YYYY-MM-DD form.
/// Anything else is rejected before a single row is written.
pub fn parse_entry_date(input: &str) -> Result<String> {
    NaiveDate::parse_from_str(input, "%d/%m/%Y")
        .map(|d| d.format("%Y-%m-%d").to_string())
        .map_err(|_| TallyError::InvalidDate(input.to_string()))
}

/// All rows, newest date first. Every other table reads back in insertion
/// order.
pub fn list_transactions(conn: &Connection) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(
        "SELECT id, amount, category_id, description, date, account_id \
         FROM transactions ORDER BY date DESC",
    )?;
    let transactions = stmt
        .query_map([], |row| {
            Ok(Transaction {
                id: row.get(0)?,
                amount: row.get(1)?,
                category_id: row.get(2)?,
                description: row.get(3)?,
                date: row.get(4)?,
                account_id: row.get(5)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(transactions)
}

/// Display join. INNER JOIN on categories means rows whose category was
/// deleted out from under them are skipped; list_transactions still returns
/// them.
pub fn list_register(conn: &Connection) -> Result<Vec<RegisterRow>> {
    let mut stmt = conn.prepare(
        "SELECT t.id, t.date, t.amount, c.name, t.description \
         FROM transactions t JOIN categories c ON c.id = t.category_id \
         ORDER BY t.date DESC",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(RegisterRow {
                id: row.get(0)?,
                date: row.get(1)?,
                amount: row.get(2)?,
                category: row.get(3)?,
                description: row.get(4)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Insert a transaction plus its optional type mapping and tag rows under a
/// single transaction: one commit at the end, rollback on drop if any
/// statement fails. Date and category are validated before anything is
/// written.
pub fn add_transaction(conn: &Connection, new: &NewTransaction) -> Result<()> {
    let date = parse_entry_date(new.date)?;
    let category_id = category_id_by_name(conn, new.category)?;
    let account_id = match new.account {
        Some(name) => Some(account_id_by_name(conn, name)?),
        None => None,
    };
    // An unknown type name is tolerated: the row goes in without a mapping.
    let type_id = new.txn_type.and_then(|name| type_id_by_name(conn, name).ok());

    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "INSERT INTO transactions (amount, category_id, description, date, account_id) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![new.amount, category_id, new.description, date, account_id],
    )?;
    let transaction_id = tx.last_insert_rowid();

    if let Some(type_id) = type_id {
        add_type_mapping(&tx, transaction_id, type_id)?;
    }
    if let Some(tags) = new.tags {
        for tag in tags.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            add_tag(&tx, transaction_id, tag)?;
        }
    }
    tx.commit()?;
    Ok(())
}

fn account_id_by_name(conn: &Connection, name: &str) -> Result<i64> {
    conn.query_row("SELECT id FROM accounts WHERE name = ?1", [name], |row| {
        row.get(0)
    })
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => TallyError::Other(format!("Unknown account: {name}")),
        other => TallyError::Db(other),
    })
}

pub fn add_type_mapping(conn: &Connection, transaction_id: i64, type_id: i64) -> Result<()> {
    conn.execute(
        "INSERT INTO transaction_type_mapping (transaction_id, type_id) VALUES (?1, ?2)",
        rusqlite::params![transaction_id, type_id],
    )?;
    Ok(())
}

pub fn list_type_mappings(conn: &Connection) -> Result<Vec<TypeMapping>> {
    let mut stmt =
        conn.prepare("SELECT transaction_id, type_id FROM transaction_type_mapping")?;
    let mappings = stmt
        .query_map([], |row| {
            Ok(TypeMapping {
                transaction_id: row.get(0)?,
                type_id: row.get(1)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(mappings)
}

pub fn add_tag(conn: &Connection, transaction_id: i64, tag: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO transaction_tags (transaction_id, tag) VALUES (?1, ?2)",
        rusqlite::params![transaction_id, tag],
    )?;
    Ok(())
}

pub fn list_tags(conn: &Connection) -> Result<Vec<TransactionTag>> {
    let mut stmt = conn.prepare("SELECT transaction_id, tag FROM transaction_tags")?;
    let tags = stmt
        .query_map([], |row| {
            Ok(TransactionTag {
                transaction_id: row.get(0)?,
                tag: row.get(1)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(tags)
}

/// Deleting an absent id is a no-op. Mapping and tag rows are left behind —
/// their declared cascades never fire.
pub fn delete_transaction(conn: &Connection, id: i64) -> Result<()> {
    conn.execute("DELETE FROM transactions WHERE id = ?1", [id])?;
    Ok(())
}
