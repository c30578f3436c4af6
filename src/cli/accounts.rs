use colored::Colorize;
use comfy_table::{Cell, Table};
use rusqlite::Connection;

use crate::db::get_connection;
use crate::error::Result;
use crate::fmt::money;
use crate::models::Account;
use crate::settings::db_path;

pub fn add(username: &str, name: &str, balance: f64) -> Result<()> {
    let conn = get_connection(&db_path())?;
    add_account(&conn, username, name, balance)?;
    println!("{} {name}", "Added account:".green());
    Ok(())
}

pub fn list() -> Result<()> {
    let conn = get_connection(&db_path())?;
    let accounts = list_accounts(&conn)?;

    let mut table = Table::new();
    table.set_header(vec!["ID", "User", "Name", "Balance"]);
    for account in accounts {
        let owner = crate::cli::users::user_name_by_id(&conn, account.user_id)?
            .unwrap_or_default();
        table.add_row(vec![
            Cell::new(account.id),
            Cell::new(owner),
            Cell::new(account.name),
            Cell::new(money(account.balance)),
        ]);
    }
    println!("Accounts\n{table}");
    Ok(())
}

pub fn delete(id: i64) -> Result<()> {
    let conn = get_connection(&db_path())?;
    delete_account(&conn, id)?;
    println!("Deleted account {id}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Data layer
// ---------------------------------------------------------------------------

pub fn list_accounts(conn: &Connection) -> Result<Vec<Account>> {
    let mut stmt = conn.prepare("SELECT id, user_id, name, balance FROM accounts")?;
    let accounts = stmt
        .query_map([], |row| {
            Ok(Account {
                id: row.get(0)?,
                user_id: row.get(1)?,
                name: row.get(2)?,
                balance: row.get(3)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(accounts)
}

/// Resolves the owner by username first; the insert carries the resolved id.
pub fn add_account(conn: &Connection, username: &str, name: &str, balance: f64) -> Result<()> {
    let user_id = crate::cli::users::user_id_by_name(conn, username)?;
    conn.execute(
        "INSERT INTO accounts (user_id, name, balance) VALUES (?1, ?2, ?3)",
        rusqlite::params![user_id, name, balance],
    )?;
    Ok(())
}

pub fn delete_account(conn: &Connection, id: i64) -> Result<()> {
    conn.execute("DELETE FROM accounts WHERE id = ?1", [id])?;
    Ok(())
}
