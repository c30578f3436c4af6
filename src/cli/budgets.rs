use colored::Colorize;
use comfy_table::{Cell, Table};
use rusqlite::Connection;

use crate::cli::categories::{category_id_by_name, category_name_by_id};
use crate::db::get_connection;
use crate::error::Result;
use crate::fmt::money;
use crate::models::Budget;
use crate::settings::db_path;

pub fn add(category: &str, amount: f64) -> Result<()> {
    let conn = get_connection(&db_path())?;
    add_budget(&conn, category, amount)?;
    println!("{} {category} {}", "Added budget:".green(), money(amount));
    Ok(())
}

pub fn list() -> Result<()> {
    let conn = get_connection(&db_path())?;
    let budgets = list_budgets(&conn)?;

    let mut table = Table::new();
    table.set_header(vec!["ID", "Category", "Amount"]);
    for budget in budgets {
        let category = category_name_by_id(&conn, budget.category_id)?.unwrap_or_default();
        table.add_row(vec![
            Cell::new(budget.id),
            Cell::new(category),
            Cell::new(money(budget.amount)),
        ]);
    }
    println!("Budgets\n{table}");
    Ok(())
}

pub fn delete(id: i64) -> Result<()> {
    let conn = get_connection(&db_path())?;
    delete_budget(&conn, id)?;
    println!("Deleted budget {id}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Data layer
// ---------------------------------------------------------------------------

pub fn list_budgets(conn: &Connection) -> Result<Vec<Budget>> {
    let mut stmt = conn.prepare("SELECT id, category_id, amount FROM budget")?;
    let budgets = stmt
        .query_map([], |row| {
            Ok(Budget {
                id: row.get(0)?,
                category_id: row.get(1)?,
                amount: row.get(2)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(budgets)
}

pub fn add_budget(conn: &Connection, category: &str, amount: f64) -> Result<()> {
    let category_id = category_id_by_name(conn, category)?;
    conn.execute(
        "INSERT INTO budget (category_id, amount) VALUES (?1, ?2)",
        rusqlite::params![category_id, amount],
    )?;
    Ok(())
}

pub fn delete_budget(conn: &Connection, id: i64) -> Result<()> {
    conn.execute("DELETE FROM budget WHERE id = ?1", [id])?;
    Ok(())
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
    fn test_seeded_budgets_listed() {
        let (_dir, conn) = test_conn();
        let budgets = list_budgets(&conn).unwrap();
        assert_eq!(budgets.len(), 2);
        assert!(budgets.iter().any(|b| b.amount == 500.00));
    }

    #[test]
    fn test_add_budget_resolves_category() {
        let (_dir, conn) = test_conn();
        add_budget(&conn, "Entertainment", 120.00).unwrap();
        let id = category_id_by_name(&conn, "Entertainment").unwrap();
        let budgets = list_budgets(&conn).unwrap();
        let added = budgets.iter().find(|b| b.amount == 120.00).unwrap();
        assert_eq!(added.category_id, id);
    }

    #[test]
    fn test_add_budget_unknown_category_rejected() {
        let (_dir, conn) = test_conn();
        let err = add_budget(&conn, "Yachts", 9000.0).unwrap_err();
        assert!(err.to_string().contains("Unknown category"));
        assert_eq!(list_budgets(&conn).unwrap().len(), 2);
    }

    #[test]
    fn test_delete_budget() {
        let (_dir, conn) = test_conn();
        let id = list_budgets(&conn).unwrap()[0].id;
        delete_budget(&conn, id).unwrap();
        assert!(list_budgets(&conn).unwrap().iter().all(|b| b.id != id));
    }

    #[test]
    fn test_delete_absent_budget_is_noop() {
        let (_dir, conn) = test_conn();
        delete_budget(&conn, 99999).unwrap();
        assert_eq!(list_budgets(&conn).unwrap().len(), 2);
    }
}
