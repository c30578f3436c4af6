use colored::Colorize;
use comfy_table::{Cell, Table};
use rusqlite::Connection;

use crate::db::get_connection;
use crate::error::{Result, TallyError};
use crate::models::Category;
use crate::settings::db_path;

pub fn add(name: &str) -> Result<()> {
    let conn = get_connection(&db_path())?;
    add_category(&conn, name)?;
    println!("{} {name}", "Added category:".green());
    Ok(())
}

pub fn list() -> Result<()> {
    let conn = get_connection(&db_path())?;
    let categories = list_categories(&conn)?;

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name"]);
    for category in categories {
        table.add_row(vec![Cell::new(category.id), Cell::new(category.name)]);
    }
    println!("Categories\n{table}");
    Ok(())
}

pub fn delete(id: i64) -> Result<()> {
    let conn = get_connection(&db_path())?;
    delete_category(&conn, id)?;
    println!("Deleted category {id}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Data layer
// ---------------------------------------------------------------------------

pub fn list_categories(conn: &Connection) -> Result<Vec<Category>> {
    let mut stmt = conn.prepare("SELECT id, name FROM categories")?;
    let categories = stmt
        .query_map([], |row| {
            Ok(Category {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(categories)
}

pub fn add_category(conn: &Connection, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(TallyError::Other("Name is required".into()));
    }
    conn.execute("INSERT INTO categories (name) VALUES (?1)", [name])?;
    Ok(())
}

pub fn category_id_by_name(conn: &Connection, name: &str) -> Result<i64> {
    conn.query_row("SELECT id FROM categories WHERE name = ?1", [name], |row| {
        row.get(0)
    })
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => TallyError::UnknownCategory(name.to_string()),
        other => TallyError::Db(other),
    })
}

pub fn category_name_by_id(conn: &Connection, id: i64) -> Result<Option<String>> {
    let mut stmt = conn.prepare("SELECT name FROM categories WHERE id = ?1")?;
    let mut rows = stmt.query_map([id], |row| row.get(0))?;
    match rows.next() {
        Some(name) => Ok(Some(name?)),
        None => Ok(None),
    }
}

/// No usage guard and no cascade: transactions and budgets that reference the
/// category keep their dangling id. Display-side joins skip them.
pub fn delete_category(conn: &Connection, id: i64) -> Result<()> {
    conn.execute("DELETE FROM categories WHERE id = ?1", [id])?;
    Ok(())
}
