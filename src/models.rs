#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// Stored and compared in clear text.
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Account {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub balance: f64,
}

#[derive(Debug, Clone)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct TransactionType {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct Transaction {
    pub id: i64,
    pub amount: f64,
    pub category_id: Option<i64>,
    pub description: String,
    /// Stored as YYYY-MM-DD.
    pub date: String,
    pub account_id: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct TypeMapping {
    pub transaction_id: i64,
    pub type_id: i64,
}

#[derive(Debug, Clone)]
pub struct TransactionTag {
    pub transaction_id: i64,
    pub tag: String,
}

#[derive(Debug, Clone)]
pub struct Budget {
    pub id: i64,
    pub category_id: i64,
    pub amount: f64,
}

/// Display row for the transaction register: the category join is resolved
/// up front so the CLI table and the interactive screen render the same data.
#[derive(Debug, Clone)]
pub struct RegisterRow {
    pub id: i64,
    pub date: String,
    pub amount: f64,
    pub category: String,
    pub description: String,
}
