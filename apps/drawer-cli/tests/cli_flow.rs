//! Runs whole command lines against a throwaway config, database and
//! guest file, one `run` per simulated process.

use std::path::{Path, PathBuf};

use drawer_cli::error::{CliResult, ErrorCode};
use serde_json::Value;
use tempfile::TempDir;

struct Workspace {
    dir: TempDir,
    config: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("drawer.toml");
        std::fs::write(&config, config_toml(dir.path())).unwrap();
        Workspace { dir, config }
    }

    async fn run(&self, line: &str) -> CliResult<String> {
        let mut args: Vec<String> = line.split_whitespace().map(str::to_string).collect();
        args.push("--config".into());
        args.push(self.config.display().to_string());
        drawer_cli::run(args).await
    }

    async fn json(&self, line: &str) -> Value {
        let out = self.run(&format!("{} --json", line)).await.unwrap();
        serde_json::from_str(&out).unwrap()
    }

    fn guest_file(&self) -> PathBuf {
        self.dir.path().join("guest.json")
    }
}

/// Counts are stored sparsely; a missing kind is zero.
fn count(drawer: &Value, kind: &str) -> i64 {
    drawer["counts"][kind].as_i64().unwrap_or(0)
}

fn config_toml(dir: &Path) -> String {
    format!(
        "[device]\nid = \"test-device\"\n\n\
         [storage]\ndb_path = '{}'\nlocal_path = '{}'\n\n\
         [save]\ndebounce_ms = 0\n",
        dir.join("data").join("drawer.db").display(),
        dir.join("guest.json").display(),
    )
}

#[tokio::test]
async fn test_help_needs_no_storage() {
    let out = drawer_cli::run(vec!["help".to_string()]).await.unwrap();
    assert!(out.starts_with("usage: drawer"));

    let kinds = drawer_cli::run(vec!["kinds".to_string()]).await.unwrap();
    assert!(kinds.contains("quarter"));
}

#[tokio::test]
async fn test_guest_counts_survive_between_runs() {
    let ws = Workspace::new();

    let out = ws.run("count quarter 8").await.unwrap();
    assert!(out.contains("Total:            $2.00"));
    assert!(ws.guest_file().exists());

    let drawer = ws.json("show").await;
    assert_eq!(drawer["index"], 1);
    assert_eq!(count(&drawer, "quarter"), 8);
    assert_eq!(drawer["total"], 200);
    assert_eq!(drawer["status"]["kind"], "belowGoal");
    assert_eq!(drawer["status"]["amount"], 9800);
}

#[tokio::test]
async fn test_guest_is_limited_to_one_drawer() {
    let ws = Workspace::new();

    let err = ws.run("--drawer 2 show").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::UpgradeRequired);
    assert!(err.hint.unwrap().contains("Sign up"));

    let err = ws.run("dark-mode on").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::AccountRequired);
}

#[tokio::test]
async fn test_bad_input_is_rejected_without_saving() {
    let ws = Workspace::new();

    let err = ws.run("count penny -3").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    let err = ws.run("count doubloon 3").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);

    let err = ws.run("target abc").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);
}

#[tokio::test]
async fn test_sign_up_unlocks_three_drawers() {
    let ws = Workspace::new();

    let out = ws.run("signup u1").await.unwrap();
    assert!(out.starts_with("Signed in as u1."));
    let config = std::fs::read_to_string(&ws.config).unwrap();
    assert!(config.contains("user_id = \"u1\""));

    ws.run("--drawer 3 count dime 10").await.unwrap();
    let status = ws.json("status").await;
    assert_eq!(status["userId"], "u1");
    assert_eq!(status["capacity"], 3);

    let rows = ws.json("summary").await;
    assert_eq!(rows.as_array().unwrap().len(), 3);
    assert_eq!(rows[2]["total"], 100);

    let err = ws.run("--drawer 4 show").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::UpgradeRequired);
    assert!(err.hint.unwrap().contains("Supporter"));
}

#[tokio::test]
async fn test_checkout_plan() {
    let ws = Workspace::new();
    ws.run("count hundred-bill 1").await.unwrap();
    ws.run("count twenty-bill 1").await.unwrap();
    ws.run("count quarter 2").await.unwrap();

    let plan = ws.json("plan").await;
    assert_eq!(plan["status"], "ABOVE_TARGET_WITH_PLAN");
    assert_eq!(plan["remainder"], 0);
    assert_eq!(plan["lines"].as_array().unwrap().len(), 2);

    let out = ws.run("checkout-target 120.50").await.unwrap();
    assert!(out.contains("At default drawer state!"));
}

#[tokio::test]
async fn test_billing_upgrades_to_supporter() {
    let ws = Workspace::new();
    ws.run("signup u1").await.unwrap();

    let out = ws.run("billing checkout u1 cus_1").await.unwrap();
    assert_eq!(out, "u1: user -> supporter");
    assert_eq!(ws.json("status").await["capacity"], 10);
    ws.run("--drawer 10 count nickel 1").await.unwrap();

    let out = ws.run("billing subscription cus_1 canceled").await.unwrap();
    assert_eq!(out, "u1: supporter -> user");

    // Drawer 10 is kept but hidden again.
    let status = ws.json("status").await;
    assert_eq!(status["capacity"], 3);
    assert_eq!(status["storedDrawers"], 10);

    let err = ws.run("billing subscription cus_404 active").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::BillingError);
}

#[tokio::test]
async fn test_sign_out_starts_a_fresh_guest() {
    let ws = Workspace::new();
    ws.run("signup u1").await.unwrap();
    ws.run("count quarter 40").await.unwrap();

    let out = ws.run("sign-out").await.unwrap();
    assert!(out.starts_with("Signed out."));

    let status = ws.json("status").await;
    assert_eq!(status["tier"], "guest");
    assert_eq!(count(&ws.json("show").await, "quarter"), 0);

    // The account's drawers are still there on sign-in.
    ws.run("signup u1").await.unwrap();
    assert_eq!(count(&ws.json("show").await, "quarter"), 40);
}

#[tokio::test]
async fn test_delete_account() {
    let ws = Workspace::new();

    let err = ws.run("delete-account --yes").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::AccountRequired);

    ws.run("signup u1").await.unwrap();
    ws.run("count quarter 40").await.unwrap();
    let out = ws.run("delete-account --yes").await.unwrap();
    assert!(out.contains("Continuing as guest"));

    ws.run("signup u1").await.unwrap();
    assert_eq!(count(&ws.json("show").await, "quarter"), 0);
}
