use crate::db::get_connection;
use crate::error::Result;
use crate::fmt::format_bytes;
use crate::settings::load_settings;

pub fn run() -> Result<()> {
    let settings = load_settings();
    let data_dir = std::path::PathBuf::from(&settings.data_dir);
    let db_path = data_dir.join("tally.db");

    println!("Data dir:   {}", data_dir.display());
    println!("Database:   {}", db_path.display());

    if db_path.exists() {
        let size = std::fs::metadata(&db_path)?.len();
        println!("DB size:    {}", format_bytes(size));

        let conn = get_connection(&db_path)?;

        let users: i64 = conn.query_row("SELECT count(*) FROM users", [], |r| r.get(0))?;
        let accounts: i64 = conn.query_row("SELECT count(*) FROM accounts", [], |r| r.get(0))?;
        let categories: i64 =
            conn.query_row("SELECT count(*) FROM categories", [], |r| r.get(0))?;
        let transactions: i64 =
            conn.query_row("SELECT count(*) FROM transactions", [], |r| r.get(0))?;
        let tagged: i64 =
            conn.query_row("SELECT count(*) FROM transaction_tags", [], |r| r.get(0))?;
        let budgets: i64 = conn.query_row("SELECT count(*) FROM budget", [], |r| r.get(0))?;

        println!();
        println!("Users:         {users}");
        println!("Accounts:      {accounts}");
        println!("Categories:    {categories}");
        println!("Transactions:  {transactions}");
        println!("Tags:          {tagged}");
        println!("Budgets:       {budgets}");
    } else {
        println!();
        println!("Database not found. Run `tally init` to set up.");
    }

    Ok(())
}
