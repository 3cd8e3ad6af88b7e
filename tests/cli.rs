use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SUMMARY_CSV: &str = "\
kuan_no,kuan,type,amount_current,amount_previous,diff,src_national,src_bond,src_other,src_general
1,町税,歳入,760000,750000,10000,,,,
2,寄附金,歳入,120000,90000,30000,,,,
2,総務費,歳出,500000,480000,20000,0,0,0,500000
10,教育費,歳出,300000,250000,50000,100000,50000,0,150000
";

const REVENUE_CSV: &str = "\
kuan,kou,moku,amount_current,setsu,setsu_amount,description
町税,町民税,個人,760000,現年課税分,760000,個人町民税
寄附金,寄附金,ふるさと納税寄附金,120000,ふるさと納税寄附金,120000,ふるさと納税
";

const EXPENDITURE_CSV: &str = "\
kuan,kou,moku,amount_current,setsu,setsu_amount,src_general,description
総務費,総務管理費,一般管理費,500000,給料,300000,300000,職員給与
総務費,総務管理費,一般管理費,500000,委託料,200000,200000,システム保守委託
教育費,中学校費,学校管理費,300000,工事請負費,300000,150000,体育館屋根改修
";

struct Fixture {
    _dir: TempDir,
    home: PathBuf,
    csv_dir: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("home");
        let csv_dir = dir.path().join("csv");
        fs::create_dir_all(&home).unwrap();
        fs::create_dir_all(&csv_dir).unwrap();
        fs::write(csv_dir.join("summary.csv"), SUMMARY_CSV).unwrap();
        fs::write(csv_dir.join("revenue.csv"), REVENUE_CSV).unwrap();
        fs::write(csv_dir.join("expenditure.csv"), EXPENDITURE_CSV).unwrap();
        Self {
            _dir: dir,
            home,
            csv_dir,
        }
    }

    /// Command isolated from the user's configuration, reading the CSV dataset
    fn cmd(&self) -> Command {
        let mut cmd = self.bare_cmd();
        cmd.arg("--data").arg(&self.csv_dir);
        cmd
    }

    fn bare_cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("mbudget").unwrap();
        cmd.env("MUNICIPAL_BUDGET_DIR", &self.home)
            .env_remove("MUNICIPAL_BUDGET_DATA")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1");
        cmd
    }

    fn path(&self, name: &str) -> PathBuf {
        self.home.join(name)
    }
}

fn read_without_bom(path: &Path) -> String {
    let bytes = fs::read(path).unwrap();
    assert!(bytes.starts_with(b"\xEF\xBB\xBF"), "missing byte-order mark");
    String::from_utf8(bytes[3..].to_vec()).unwrap()
}

#[test]
fn test_overview_shows_hero_and_highlights() {
    let fx = Fixture::new();
    fx.cmd()
        .arg("overview")
        .assert()
        .success()
        .stdout(predicate::str::contains("8.0億円"))
        .stdout(predicate::str::contains("+9.6% 前年度比"))
        .stdout(predicate::str::contains("最大の款は総務費"))
        .stdout(predicate::str::contains("その他"));
}

#[test]
fn test_overview_revenue_side() {
    let fx = Fixture::new();
    fx.cmd()
        .args(["--type", "revenue", "overview"])
        .assert()
        .success()
        .stdout(predicate::str::contains("歳入"))
        .stdout(predicate::str::contains("8.8億円"))
        .stdout(predicate::str::contains("寄附金は1.2億円で歳入の14%"));
}

#[test]
fn test_chart_commands() {
    let fx = Fixture::new();
    fx.cmd()
        .args(["chart", "ranked"])
        .assert()
        .success()
        .stdout(predicate::str::contains("款別金額"))
        .stdout(predicate::str::contains("教育費"));

    fx.cmd()
        .args(["chart", "comparison"])
        .assert()
        .success()
        .stdout(predicate::str::contains("▲ +5,000万"));

    fx.cmd()
        .args(["chart", "funding"])
        .assert()
        .success()
        .stdout(predicate::str::contains("町の一般財源"));

    fx.cmd()
        .args(["chart", "composition", "--top", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("上位1款"));
}

#[test]
fn test_kuan_drilldown_and_listing() {
    let fx = Fixture::new();
    fx.cmd()
        .args(["kuan", "総務費"])
        .assert()
        .success()
        .stdout(predicate::str::contains("明細 2件"))
        .stdout(predicate::str::contains("一般管理費"))
        .stdout(predicate::str::contains("5.0億円"));

    fx.cmd()
        .arg("kuan")
        .assert()
        .success()
        .stdout(predicate::str::contains("款一覧"))
        .stdout(predicate::str::contains("教育費"));
}

#[test]
fn test_kuan_sum_policy_doubles_repeated_item_amount() {
    let fx = Fixture::new();
    fx.cmd()
        .args(["kuan", "総務費", "--policy", "sum"])
        .assert()
        .success()
        .stdout(predicate::str::contains("10.0億円"));
}

#[test]
fn test_unknown_kuan_fails() {
    let fx = Fixture::new();
    fx.cmd()
        .args(["kuan", "宇宙開発費"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Budget category not found: 宇宙開発費"));
}

#[test]
fn test_search_terminal_and_empty_result() {
    let fx = Fixture::new();
    fx.cmd()
        .args(["search", "総務費", "委託"])
        .assert()
        .success()
        .stdout(predicate::str::contains("該当 1件"))
        .stdout(predicate::str::contains("システム保守委託"));

    fx.cmd()
        .args(["search", "存在しない語"])
        .assert()
        .success()
        .stdout(predicate::str::contains("該当 0件"));
}

#[test]
fn test_search_exports_csv_with_bom() {
    let fx = Fixture::new();
    let out = fx.path("hits.csv");
    fx.cmd()
        .args(["search", "総務費"])
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("2件を書き出しました"));

    let text = read_without_bom(&out);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "款,項,目,節,金額(千円),説明");
    assert_eq!(lines[1], "総務費,総務管理費,一般管理費,給料,300000,職員給与");
    assert_eq!(lines.len(), 3);
}

#[test]
fn test_export_formats() {
    let fx = Fixture::new();

    let csv_out = fx.path("all.csv");
    fx.cmd().args(["export", "csv"]).arg(&csv_out).assert().success();
    assert_eq!(read_without_bom(&csv_out).lines().count(), 4);

    fx.cmd()
        .current_dir(&fx.home)
        .args(["export", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("budget_detail.csv"));
    assert_eq!(read_without_bom(&fx.path("budget_detail.csv")).lines().count(), 4);

    let json_out = fx.path("exp.json");
    fx.cmd().args(["export", "json"]).arg(&json_out).assert().success();
    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&json_out).unwrap()).unwrap();
    assert_eq!(value["budget_type"], "expenditure");
    assert_eq!(value["totals"]["total_current"], 800_000);
    assert_eq!(value["funding"]["rows"][0]["kuan"], "教育費");

    let yaml_out = fx.path("rev.yaml");
    fx.cmd()
        .args(["--type", "revenue", "export", "yaml"])
        .arg(&yaml_out)
        .assert()
        .success();
    let yaml = fs::read_to_string(&yaml_out).unwrap();
    assert!(yaml.contains("budget_type: revenue"));
}

#[test]
fn test_import_then_read_sqlite() {
    let fx = Fixture::new();
    let db = fx.path("budget.db");

    fx.bare_cmd()
        .arg("import")
        .arg(&fx.csv_dir)
        .arg("--output")
        .arg(&db)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 9 rows"));

    fx.bare_cmd()
        .arg("--data")
        .arg(&db)
        .arg("overview")
        .assert()
        .success()
        .stdout(predicate::str::contains("8.0億円"));

    // A second import must not clobber the dataset
    fx.bare_cmd()
        .arg("import")
        .arg(&fx.csv_dir)
        .arg("--output")
        .arg(&db)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Refusing to overwrite"));
}

#[test]
fn test_missing_dataset_is_fatal() {
    let fx = Fixture::new();
    fx.bare_cmd()
        .arg("--data")
        .arg(fx.path("nope.db"))
        .arg("overview")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load dataset"));
}

#[test]
fn test_check_reports_consistent_fixture() {
    let fx = Fixture::new();
    fx.cmd()
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("データ整合性チェック"))
        .stdout(predicate::str::contains("問題は見つかりませんでした"));
}

#[test]
fn test_check_reports_quarantined_rows() {
    let fx = Fixture::new();
    fs::write(
        fx.csv_dir.join("expenditure.csv"),
        format!("{}教育費,中学校費,学校管理費,300000,工事請負費,,,\n", EXPENDITURE_CSV),
    )
    .unwrap();

    fx.cmd()
        .args(["-v", "check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[expenditure] row 4 skipped: missing setsu_amount"))
        .stderr(predicate::str::contains("quarantined row"));
}

#[test]
fn test_line_without_item_amount_is_searchable_and_imported() {
    let fx = Fixture::new();
    fs::write(
        fx.csv_dir.join("expenditure.csv"),
        format!(
            "{}総務費,土木管理費,道路維持費,,工事請負費,200,,道路補修\n教育費,中学校費,学校管理費,\"300,000\",備品購入費,,,\n",
            EXPENDITURE_CSV
        ),
    )
    .unwrap();

    fx.cmd()
        .args(["search", "道路"])
        .assert()
        .success()
        .stdout(predicate::str::contains("該当 1件"))
        .stdout(predicate::str::contains("道路補修"));

    let db = fx.path("budget.db");
    fx.bare_cmd()
        .arg("import")
        .arg(&fx.csv_dir)
        .arg("--output")
        .arg(&db)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 11 rows"));

    fx.bare_cmd()
        .arg("--data")
        .arg(&db)
        .args(["search", "道路"])
        .assert()
        .success()
        .stdout(predicate::str::contains("該当 1件"));

    fx.bare_cmd()
        .arg("--data")
        .arg(&db)
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("[expenditure] row 5 skipped: missing setsu_amount"));
}

#[test]
fn test_config_init_and_show() {
    let fx = Fixture::new();
    fx.bare_cmd()
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote default settings"));
    assert!(fx.path("config.json").exists());

    fx.bare_cmd()
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    fx.bare_cmd()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Population:      7669"))
        .stdout(predicate::str::contains("budget.db"));
}

#[test]
fn test_config_init_force_repairs_unreadable_settings() {
    let fx = Fixture::new();
    fs::write(fx.path("config.json"), "{ not json").unwrap();

    fx.bare_cmd()
        .arg("config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse settings file"));

    fx.bare_cmd()
        .args(["config", "init", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote default settings"));

    fx.bare_cmd()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Population:      7669"));
}

#[test]
fn test_bad_budget_type_is_rejected() {
    let fx = Fixture::new();
    fx.cmd()
        .args(["--type", "capital", "overview"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown budget type"));
}
