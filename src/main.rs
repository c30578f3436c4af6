mod cli;
mod db;
mod error;
mod fmt;
mod models;
mod settings;
mod tui;

use clap::Parser;

use cli::{
    AccountsCommands, BudgetsCommands, CategoriesCommands, Cli, Commands, TxnCommands,
    TypesCommands, UsersCommands,
};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        None => cli::users::authenticate().and_then(|username| cli::txn_manager::run(&username)),
        Some(Commands::Init { data_dir }) => cli::init::run(data_dir),
        Some(Commands::Login) => cli::users::login(),
        Some(Commands::Users { command }) => match command {
            UsersCommands::Add { username, password } => cli::users::add(&username, &password),
            UsersCommands::List => cli::users::list(),
            UsersCommands::Delete { id } => cli::users::delete(id),
        },
        Some(Commands::Accounts { command }) => match command {
            AccountsCommands::Add {
                user,
                name,
                balance,
            } => cli::accounts::add(&user, &name, balance),
            AccountsCommands::List => cli::accounts::list(),
            AccountsCommands::Delete { id } => cli::accounts::delete(id),
        },
        Some(Commands::Categories { command }) => match command {
            CategoriesCommands::Add { name } => cli::categories::add(&name),
            CategoriesCommands::List => cli::categories::list(),
            CategoriesCommands::Delete { id } => cli::categories::delete(id),
        },
        Some(Commands::Types { command }) => match command {
            TypesCommands::Add { name } => cli::types::add(&name),
            TypesCommands::List => cli::types::list(),
        },
        Some(Commands::Budgets { command }) => match command {
            BudgetsCommands::Add { category, amount } => cli::budgets::add(&category, amount),
            BudgetsCommands::List => cli::budgets::list(),
            BudgetsCommands::Delete { id } => cli::budgets::delete(id),
        },
        Some(Commands::Txn { command }) => match command {
            TxnCommands::Add {
                amount,
                category,
                description,
                date,
                account,
                txn_type,
                tags,
            } => cli::transactions::add(cli::transactions::NewTransaction {
                amount,
                category: &category,
                description: &description,
                date: &date,
                account: account.as_deref(),
                txn_type: txn_type.as_deref(),
                tags: tags.as_deref(),
            }),
            TxnCommands::List => cli::transactions::list(),
            TxnCommands::Delete { id } => cli::transactions::delete(id),
            TxnCommands::Tags => cli::transactions::tags(),
        },
        Some(Commands::Manage) => cli::txn_manager::run("register"),
        Some(Commands::Status) => cli::status::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
