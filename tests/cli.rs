use assert_cmd::Command;
use predicates::prelude::*;

/// Each test gets its own HOME so settings.json and the database are isolated.
fn tally(home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("tally").unwrap();
    cmd.env("HOME", home);
    cmd
}

fn init(home: &std::path::Path) {
    let data_dir = home.join("data");
    tally(home)
        .args(["init", "--data-dir", data_dir.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized tally"));
}

#[test]
fn test_init_seeds_categories() {
    let home = tempfile::tempdir().unwrap();
    init(home.path());

    tally(home.path())
        .args(["categories", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Groceries"))
        .stdout(predicate::str::contains("Salary"));
}

#[test]
fn test_add_and_delete_category() {
    let home = tempfile::tempdir().unwrap();
    init(home.path());

    tally(home.path())
        .args(["categories", "add", "Gifts"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added category: Gifts"));

    let output = tally(home.path())
        .args(["categories", "list"])
        .output()
        .unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    let id: i64 = stdout
        .lines()
        .find(|line| line.contains("Gifts"))
        .and_then(|line| {
            line.split_whitespace()
                .find_map(|token| token.parse().ok())
        })
        .expect("Gifts row with an id in categories list");

    tally(home.path())
        .args(["categories", "delete", &id.to_string()])
        .assert()
        .success();

    tally(home.path())
        .args(["categories", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Gifts").not());
}

#[test]
fn test_txn_add_rejects_invalid_date() {
    let home = tempfile::tempdir().unwrap();
    init(home.path());

    tally(home.path())
        .args([
            "txn", "add", "12.50", "--category", "Groceries", "--date", "2024-01-01",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date"));
}

#[test]
fn test_txn_add_and_list() {
    let home = tempfile::tempdir().unwrap();
    init(home.path());

    tally(home.path())
        .args([
            "txn",
            "add",
            "42.00",
            "--category",
            "Transport",
            "--description",
            "taxi home",
            "--date",
            "14/02/2024",
            "--type",
            "Expense",
            "--tags",
            "late,work",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added transaction"));

    tally(home.path())
        .args(["txn", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("taxi home"))
        .stdout(predicate::str::contains("2024-02-14"));

    tally(home.path())
        .args(["txn", "tags"])
        .assert()
        .success()
        .stdout(predicate::str::contains("late"))
        .stdout(predicate::str::contains("work"));
}

#[test]
fn test_users_add_duplicate_fails() {
    let home = tempfile::tempdir().unwrap();
    init(home.path());

    tally(home.path())
        .args(["users", "add", "carol", "--password", "pw"])
        .assert()
        .success();

    tally(home.path())
        .args(["users", "add", "carol", "--password", "other"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_status_reports_counts() {
    let home = tempfile::tempdir().unwrap();
    init(home.path());

    tally(home.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"Users:\s+2").unwrap())
        .stdout(predicate::str::is_match(r"Categories:\s+8").unwrap());
}

#[test]
fn test_budgets_add_unknown_category_fails() {
    let home = tempfile::tempdir().unwrap();
    init(home.path());

    tally(home.path())
        .args(["budgets", "add", "Yachts", "100"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown category"));
}
