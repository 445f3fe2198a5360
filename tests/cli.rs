use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;
use tempfile::tempdir;

fn climadash() -> Command {
    Command::cargo_bin("climadash").unwrap()
}

#[test]
fn cli_shows_help() {
    climadash()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("climadash"))
        .stdout(predicate::str::contains("render"));
}

#[test]
fn options_lists_dimensions() {
    climadash()
        .arg("options")
        .assert()
        .success()
        .stdout(predicate::str::contains("rainfall (Rainfall by Region and Year)"))
        .stdout(predicate::str::contains("region: All Regions | Mountain, Hill, Terai"))
        .stdout(predicate::str::contains("site: All Sites | Kathmandu, Bhaktapur, Lalitpur"));
}

#[test]
fn summary_of_a_filtered_chart() {
    climadash()
        .args([
            "summary",
            "--chart",
            "rainfall",
            "--select",
            "region=Mountain",
            "--select",
            "year=2022",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("rainfall • Mountain  count=5"))
        .stdout(predicate::str::contains("max=25.7"))
        .stdout(predicate::str::contains("Hill").not());
}

#[test]
fn trend_over_one_year() {
    climadash()
        .args(["trend", "--select", "year=2023"])
        .assert()
        .success()
        .stdout(predicate::str::contains("n=12"))
        .stdout(predicate::str::contains("Positive correlation"));
}

#[test]
fn invalid_choice_is_reported() {
    climadash()
        .args(["summary", "--chart", "pollution", "--select", "site=Pokhara"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a valid choice"));
}

#[test]
fn malformed_selection_is_reported() {
    climadash()
        .args(["summary", "--chart", "climate", "--select", "year"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected dimension=value"));
}

#[test]
fn render_single_chart_and_all() {
    let dir = tempdir().unwrap();
    let single = dir.path().join("temperature.svg");
    climadash()
        .args(["render", "--chart", "temperature", "--width", "640", "-o"])
        .arg(&single)
        .assert()
        .success();
    assert!(std::fs::read_to_string(&single).unwrap().contains("<svg"));

    let all = dir.path().join("charts");
    climadash()
        .args(["render", "--chart", "all", "--select", "year=2023", "-o"])
        .arg(&all)
        .assert()
        .success();
    for name in ["rainfall", "temperature", "climate", "pollution"] {
        assert!(all.join(format!("{name}.svg")).exists(), "{name}");
    }
}

#[test]
fn export_and_reload_bundle() {
    let dir = tempdir().unwrap();
    let bundle = dir.path().join("bundle.json");
    climadash()
        .args(["dump-data", "-o"])
        .arg(&bundle)
        .assert()
        .success();

    let out = dir.path().join("sites.csv");
    climadash()
        .args(["export", "--chart", "pollution", "--select", "site=Lalitpur", "--data"])
        .arg(&bundle)
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stderr(predicate::str::contains("Saved 1 rows"));
    let text = std::fs::read_to_string(&out).unwrap();
    assert!(text.starts_with("name,fineParticles,coarseParticles,humidity"));
    assert!(text.contains("Lalitpur"));
}

#[test]
fn export_needs_a_single_chart() {
    let dir = tempdir().unwrap();
    climadash()
        .args(["export", "--chart", "all", "-o"])
        .arg(dir.path().join("x.csv"))
        .assert()
        .failure();
}
