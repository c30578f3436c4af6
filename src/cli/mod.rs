pub mod accounts;
pub mod budgets;
pub mod categories;
pub mod init;
pub mod status;
pub mod transactions;
pub mod txn_manager;
pub mod types;
pub mod users;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tally", about = "Single-user personal finance tracker backed by SQLite.")]
pub struct Cli {
    /// With no subcommand, log in and open the interactive register.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up tally: choose a data directory and initialize the database.
    Init {
        /// Path for tally data (default: ~/Documents/tally)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Check credentials against the users table.
    Login,
    /// Manage users.
    Users {
        #[command(subcommand)]
        command: UsersCommands,
    },
    /// Manage accounts.
    Accounts {
        #[command(subcommand)]
        command: AccountsCommands,
    },
    /// Manage categories.
    Categories {
        #[command(subcommand)]
        command: CategoriesCommands,
    },
    /// Manage transaction types.
    Types {
        #[command(subcommand)]
        command: TypesCommands,
    },
    /// Manage budgets.
    Budgets {
        #[command(subcommand)]
        command: BudgetsCommands,
    },
    /// Manage transactions.
    Txn {
        #[command(subcommand)]
        command: TxnCommands,
    },
    /// Open the interactive transaction register.
    Manage,
    /// Show current database and summary statistics.
    Status,
}

#[derive(Subcommand)]
pub enum UsersCommands {
    /// Add a new user (rejects duplicates by username).
    Add {
        username: String,
        /// Password, stored in clear text
        #[arg(long)]
        password: String,
    },
    /// List all users.
    List,
    /// Delete a user by ID. Their accounts are left in place.
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub enum AccountsCommands {
    /// Add a new account for a user.
    Add {
        /// Owner's username
        user: String,
        /// Account name, e.g. 'main checking'
        name: String,
        /// Opening balance
        #[arg(long, default_value = "0")]
        balance: f64,
    },
    /// List all accounts.
    List,
    /// Delete an account by ID.
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub enum CategoriesCommands {
    /// Add a category.
    Add { name: String },
    /// List all categories.
    List,
    /// Delete a category by ID. Referencing transactions are left in place.
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub enum TypesCommands {
    /// Add a transaction type.
    Add { name: String },
    /// List all transaction types.
    List,
}

#[derive(Subcommand)]
pub enum BudgetsCommands {
    /// Add a budget for a category.
    Add {
        /// Category name
        category: String,
        /// Budgeted amount
        amount: f64,
    },
    /// List all budgets.
    List,
    /// Delete a budget by ID.
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub enum TxnCommands {
    /// Add a transaction.
    Add {
        /// Amount (positive for income, negative for spending)
        amount: f64,
        /// Category name
        #[arg(long)]
        category: String,
        /// Free-form description
        #[arg(long, default_value = "")]
        description: String,
        /// Date: DD/MM/YYYY
        #[arg(long)]
        date: String,
        /// Account name
        #[arg(long)]
        account: Option<String>,
        /// Transaction type name, e.g. Expense or Income
        #[arg(long = "type")]
        txn_type: Option<String>,
        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
    },
    /// List transactions, newest first.
    List,
    /// Delete a transaction by ID.
    Delete { id: i64 },
    /// List all transaction tags.
    Tags,
}
