use colored::Colorize;
use comfy_table::{Cell, Table};
use rusqlite::Connection;

use crate::db::get_connection;
use crate::error::{Result, TallyError};
use crate::models::TransactionType;
use crate::settings::db_path;

pub fn add(name: &str) -> Result<()> {
    let conn = get_connection(&db_path())?;
    add_type(&conn, name)?;
    println!("{} {name}", "Added transaction type:".green());
    Ok(())
}

pub fn list() -> Result<()> {
    let conn = get_connection(&db_path())?;
    let types = list_types(&conn)?;

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name"]);
    for t in types {
        table.add_row(vec![Cell::new(t.id), Cell::new(t.name)]);
    }
    println!("Transaction types\n{table}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Data layer
// ---------------------------------------------------------------------------

pub fn list_types(conn: &Connection) -> Result<Vec<TransactionType>> {
    let mut stmt = conn.prepare("SELECT id, name FROM transaction_types")?;
    let types = stmt
        .query_map([], |row| {
            Ok(TransactionType {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(types)
}

pub fn add_type(conn: &Connection, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(TallyError::Other("Name is required".into()));
    }
    conn.execute("INSERT INTO transaction_types (name) VALUES (?1)", [name])?;
    Ok(())
}

pub fn type_id_by_name(conn: &Connection, name: &str) -> Result<i64> {
    conn.query_row(
        "SELECT id FROM transaction_types WHERE name = ?1",
        [name],
        |row| row.get(0),
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => TallyError::UnknownType(name.to_string()),
        other => TallyError::Db(other),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;

    fn test_conn() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }

    #[test]
    fn test_seeded_types() {
        let (_dir, conn) = test_conn();
        let types = list_types(&conn).unwrap();
        assert_eq!(types.len(), 2);
        assert!(types.iter().any(|t| t.name == "Expense"));
        assert!(types.iter().any(|t| t.name == "Income"));
    }

    #[test]
    fn test_add_and_resolve_type() {
        let (_dir, conn) = test_conn();
        add_type(&conn, "Transfer").unwrap();
        let id = type_id_by_name(&conn, "Transfer").unwrap();
        assert!(id > 0);
    }

    #[test]
    fn test_unknown_type_rejected() {
        let (_dir, conn) = test_conn();
        let err = type_id_by_name(&conn, "Barter").unwrap_err();
        assert!(err.to_string().contains("Unknown transaction type"));
    }

    #[test]
    fn test_add_blank_type_rejected() {
        let (_dir, conn) = test_conn();
        assert!(add_type(&conn, " ").is_err());
    }
}
