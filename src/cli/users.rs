use colored::Colorize;
use comfy_table::{Cell, Table};
use rusqlite::Connection;
use zeroize::Zeroize;

use crate::db::get_connection;
use crate::error::{Result, TallyError};
use crate::models::User;
use crate::settings::db_path;

pub fn add(username: &str, password: &str) -> Result<()> {
    let conn = get_connection(&db_path())?;
    register_user(&conn, username, password)?;
    println!("{} {username}", "Added user:".green());
    Ok(())
}

pub fn list() -> Result<()> {
    let conn = get_connection(&db_path())?;
    let users = list_users(&conn)?;

    let mut table = Table::new();
    table.set_header(vec!["ID", "Username", "Password"]);
    for user in users {
        table.add_row(vec![
            Cell::new(user.id),
            Cell::new(user.username),
            Cell::new(user.password),
        ]);
    }
    println!("Users\n{table}");
    Ok(())
}

pub fn delete(id: i64) -> Result<()> {
    let conn = get_connection(&db_path())?;
    delete_user(&conn, id)?;
    println!("Deleted user {id}");
    Ok(())
}

/// Prompt for credentials and check them against the users table.
/// Returns the username on success.
pub fn authenticate() -> Result<String> {
    use std::io::Write;

    let conn = get_connection(&db_path())?;

    print!("Username: ");
    std::io::stdout().flush()?;
    let mut username = String::new();
    std::io::stdin().read_line(&mut username)?;
    let username = username.trim().to_string();

    let mut password = rpassword::prompt_password("Password: ")
        .map_err(|e| TallyError::Other(e.to_string()))?;
    let ok = verify_credentials(&conn, &username, &mut password)?;

    if ok {
        Ok(username)
    } else {
        Err(TallyError::Other("Invalid username or password".into()))
    }
}

pub fn login() -> Result<()> {
    let username = authenticate()?;
    println!("{}", format!("Welcome, {username}").green());
    Ok(())
}

// ---------------------------------------------------------------------------
// Data layer
// ---------------------------------------------------------------------------

pub fn list_users(conn: &Connection) -> Result<Vec<User>> {
    let mut stmt = conn.prepare("SELECT id, username, password FROM users")?;
    let users = stmt
        .query_map([], |row| {
            Ok(User {
                id: row.get(0)?,
                username: row.get(1)?,
                password: row.get(2)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(users)
}

pub fn add_user(conn: &Connection, username: &str, password: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO users (username, password) VALUES (?1, ?2)",
        [username, password],
    )?;
    Ok(())
}

pub fn user_exists(conn: &Connection, username: &str) -> Result<bool> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM users WHERE username = ?1)",
        [username],
        |row| row.get(0),
    )?;
    Ok(exists)
}

/// Existence check and insert are separate statements; nothing in the schema
/// backs the uniqueness up.
pub fn register_user(conn: &Connection, username: &str, password: &str) -> Result<()> {
    if username.is_empty() || password.is_empty() {
        return Err(TallyError::Other(
            "Username and password must not be empty".into(),
        ));
    }
    if user_exists(conn, username)? {
        return Err(TallyError::DuplicateUser(username.to_string()));
    }
    add_user(conn, username, password)
}

/// Check credentials and wipe the password buffer before returning,
/// whether the query succeeded or not.
pub fn verify_credentials(
    conn: &Connection,
    username: &str,
    password: &mut String,
) -> Result<bool> {
    let result = check_credentials(conn, username, password);
    password.zeroize();
    result
}

/// Plain-text comparison inside the query, as stored.
pub fn check_credentials(conn: &Connection, username: &str, password: &str) -> Result<bool> {
    let ok: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM users WHERE username = ?1 AND password = ?2)",
        [username, password],
        |row| row.get(0),
    )?;
    Ok(ok)
}

pub fn user_id_by_name(conn: &Connection, username: &str) -> Result<i64> {
    conn.query_row("SELECT id FROM users WHERE username = ?1", [username], |row| {
        row.get(0)
    })
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => TallyError::UnknownUser(username.to_string()),
        other => TallyError::Db(other),
    })
}

pub fn user_name_by_id(conn: &Connection, id: i64) -> Result<Option<String>> {
    let mut stmt = conn.prepare("SELECT username FROM users WHERE id = ?1")?;
    let mut rows = stmt.query_map([id], |row| row.get(0))?;
    match rows.next() {
        Some(name) => Ok(Some(name?)),
        None => Ok(None),
    }
}

/// Deleting an absent id is a successful no-op. The declared cascade on
/// accounts.user_id never fires, so the user's accounts stay behind.
pub fn delete_user(conn: &Connection, id: i64) -> Result<()> {
    conn.execute("DELETE FROM users WHERE id = ?1", [id])?;
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
    fn test_seeded_users_listed() {
        let (_dir, conn) = test_conn();
        let users = list_users(&conn).unwrap();
        assert_eq!(users.len(), 2);
        assert!(users.iter().any(|u| u.username == "user1"));
    }

    #[test]
    fn test_register_and_check_credentials() {
        let (_dir, conn) = test_conn();
        register_user(&conn, "alice", "hunter2").unwrap();
        assert!(check_credentials(&conn, "alice", "hunter2").unwrap());
        assert!(!check_credentials(&conn, "alice", "wrong").unwrap());
        assert!(!check_credentials(&conn, "nobody", "hunter2").unwrap());
    }

    #[test]
    fn test_verify_credentials_wipes_password() {
        let (_dir, conn) = test_conn();
        let mut password = "password1".to_string();
        assert!(verify_credentials(&conn, "user1", &mut password).unwrap());
        assert!(password.is_empty());
    }

    #[test]
    fn test_verify_credentials_wipes_password_on_error() {
        // Bare connection, no tables: the query fails, but the buffer is
        // still wiped before the error comes back.
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("bare.db")).unwrap();
        let mut password = "secret".to_string();
        assert!(verify_credentials(&conn, "user1", &mut password).is_err());
        assert!(password.is_empty());
    }

    #[test]
    fn test_register_duplicate_rejected() {
        let (_dir, conn) = test_conn();
        register_user(&conn, "bob", "pw").unwrap();
        let err = register_user(&conn, "bob", "other").unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_register_empty_fields_rejected() {
        let (_dir, conn) = test_conn();
        assert!(register_user(&conn, "", "pw").is_err());
        assert!(register_user(&conn, "carol", "").is_err());
    }

    #[test]
    fn test_add_user_bypasses_existence_check() {
        // add_user is the raw insert — duplicates go straight in.
        let (_dir, conn) = test_conn();
        add_user(&conn, "dup", "a").unwrap();
        add_user(&conn, "dup", "b").unwrap();
        let count: i64 = conn
            .query_row("SELECT count(*) FROM users WHERE username = 'dup'", [], |r| {
                r.get(0)
            })
            .unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_user_id_lookup() {
        let (_dir, conn) = test_conn();
        let id = user_id_by_name(&conn, "user1").unwrap();
        assert_eq!(user_name_by_id(&conn, id).unwrap().as_deref(), Some("user1"));
        assert!(user_name_by_id(&conn, 99999).unwrap().is_none());
        let err = user_id_by_name(&conn, "ghost").unwrap_err();
        assert!(err.to_string().contains("Unknown user"));
    }

    #[test]
    fn test_delete_user_leaves_accounts_orphaned() {
        // The schema declares ON DELETE CASCADE on accounts.user_id, but the
        // pragma is off — accounts survive their owner. Actual behavior, pinned.
        let (_dir, conn) = test_conn();
        let id = user_id_by_name(&conn, "user1").unwrap();
        let before: i64 = conn
            .query_row(
                "SELECT count(*) FROM accounts WHERE user_id = ?1",
                [id],
                |r| r.get(0),
            )
            .unwrap();
        assert!(before > 0);

        delete_user(&conn, id).unwrap();

        let after: i64 = conn
            .query_row(
                "SELECT count(*) FROM accounts WHERE user_id = ?1",
                [id],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(after, before, "accounts must survive their deleted owner");
    }

    #[test]
    fn test_delete_absent_user_is_noop() {
        let (_dir, conn) = test_conn();
        delete_user(&conn, 99999).unwrap();
        assert_eq!(list_users(&conn).unwrap().len(), 2);
    }
}
