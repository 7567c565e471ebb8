use std::{
    path::{Path, PathBuf},
    process::{Command, Output},
};

use serde_json::{Value, json};

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn guide(slug: &str, os: &str, title: &str, keywords: &[&str]) -> Value {
    json!({
        "id": slug,
        "slug": slug,
        "os": os,
        "osVersion": { "min": "10" },
        "title": title,
        "summary": "Kurze Anleitung.",
        "keywords": keywords,
        "estimatedMinutes": 2,
        "steps": [
            { "title": "Tasten drücken", "description": "Beide Tasten gleichzeitig." }
        ]
    })
}

fn setup_fixture(root: &Path) -> Result<(), Box<dyn std::error::Error>> {
    for (os, value) in [
        (
            "ios",
            guide(
                "ios-screenshot",
                "ios",
                "Screenshot am iPhone",
                &["screenshot", "bildschirmfoto"],
            ),
        ),
        (
            "android",
            guide(
                "android-update",
                "android",
                "Android aktualisieren",
                &["system update"],
            ),
        ),
    ] {
        let dir = root.join(os);
        std::fs::create_dir_all(&dir)?;
        let slug = value["slug"].as_str().unwrap_or_default().to_string();
        std::fs::write(
            dir.join(format!("{slug}.json")),
            serde_json::to_string_pretty(&value)?,
        )?;
    }
    Ok(())
}

fn run(root: &Path, args: &[&str]) -> Result<Output, Box<dyn std::error::Error>> {
    Ok(Command::new(howto_bin()?)
        .args(args)
        .arg("--content-dir")
        .arg(root)
        .env_remove("HOWTO_LOG")
        .output()?)
}

#[test]
fn validate_accepts_valid_content() -> TestResult {
    let tempdir = tempfile::tempdir()?;
    setup_fixture(tempdir.path())?;

    let output = run(tempdir.path(), &["validate"])?;
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("ios-screenshot.json gültig."));
    assert!(stdout.contains("Alle HowTo-Dateien sind gültig."));
    Ok(())
}

#[test]
fn validate_reports_errors_and_fails() -> TestResult {
    let tempdir = tempfile::tempdir()?;
    setup_fixture(tempdir.path())?;
    let mut bad = guide("broken", "ios", "Kaputt", &["kaputt"]);
    bad["estimatedMinutes"] = json!(0);
    std::fs::write(
        tempdir.path().join("ios").join("broken.json"),
        serde_json::to_string(&bad)?,
    )?;

    let output = run(tempdir.path(), &["validate", "--json"])?;
    assert_eq!(output.status.code(), Some(1));

    let report: Value = serde_json::from_slice(&output.stdout)?;
    let files = report.as_array().ok_or("expected array")?;
    assert_eq!(files.len(), 3);
    let broken = files
        .iter()
        .find(|f| f["file"].as_str().is_some_and(|p| p.ends_with("broken.json")))
        .ok_or("broken.json missing")?;
    assert_eq!(broken["valid"], json!(false));
    assert_eq!(broken["errors"].as_array().map(Vec::len), Some(1));
    Ok(())
}

#[test]
fn search_json_finds_typo() -> TestResult {
    let tempdir = tempfile::tempdir()?;
    setup_fixture(tempdir.path())?;

    let output = run(tempdir.path(), &["search", "screnshot", "--json"])?;
    assert!(output.status.success());

    let response: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(response["normalizedQuery"], json!("screnshot"));
    assert!(response.get("intent").is_none());
    let items = response["items"].as_array().ok_or("expected items")?;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["howTo"]["slug"], json!("ios-screenshot"));
    Ok(())
}

#[test]
fn search_without_hits_suggests() -> TestResult {
    let tempdir = tempfile::tempdir()?;
    setup_fixture(tempdir.path())?;

    let output = run(tempdir.path(), &["search", "zzzzzz", "--json"])?;
    assert!(output.status.success());

    let response: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(response["items"], json!([]));
    assert_eq!(response["suggestions"].as_array().map(Vec::len), Some(2));
    Ok(())
}

#[test]
fn search_resolves_synonym_intent() -> TestResult {
    let tempdir = tempfile::tempdir()?;
    setup_fixture(tempdir.path())?;

    let output = run(tempdir.path(), &["search", "Bildschirmfoto", "--json"])?;
    assert!(output.status.success());

    let response: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(response["intent"], json!("screenshot"));
    assert_eq!(response["items"][0]["howTo"]["slug"], json!("ios-screenshot"));
    assert_eq!(response["items"][0]["score"], json!(1.0));
    Ok(())
}

#[test]
fn search_human_output_is_german() -> TestResult {
    let tempdir = tempfile::tempdir()?;
    setup_fixture(tempdir.path())?;

    let output = run(tempdir.path(), &["search", "Bildschirmfoto"])?;
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("/howto/ios-screenshot"));
    assert!(stdout.contains("1 Treffer"));
    assert!(stdout.contains("Absicht: screenshot"));

    let output = run(tempdir.path(), &["search", "zzzzzz"])?;
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("Keine Treffer gefunden."));
    Ok(())
}

#[test]
fn validate_flags_guide_in_wrong_os_folder() -> TestResult {
    let tempdir = tempfile::tempdir()?;
    setup_fixture(tempdir.path())?;
    let dir = tempdir.path().join("windows");
    std::fs::create_dir_all(&dir)?;
    std::fs::write(
        dir.join("ipad-screenshot.json"),
        serde_json::to_string(&guide(
            "ipad-screenshot",
            "ipados",
            "Screenshot am iPad",
            &["screenshot"],
        ))?,
    )?;

    let output = run(tempdir.path(), &["validate"])?;
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr)?;
    assert!(
        stderr.contains("Ordner 'windows' passt nicht zum Betriebssystem 'ipados'.")
    );
    Ok(())
}

#[test]
fn show_unknown_slug_fails() -> TestResult {
    let tempdir = tempfile::tempdir()?;
    setup_fixture(tempdir.path())?;

    let output = run(tempdir.path(), &["show", "does-not-exist"])?;
    assert!(!output.status.success());
    assert!(String::from_utf8(output.stderr)?.contains("does-not-exist"));
    Ok(())
}

#[test]
fn precache_lists_guides() -> TestResult {
    let tempdir = tempfile::tempdir()?;
    setup_fixture(tempdir.path())?;

    let output = run(tempdir.path(), &["precache", "--json"])?;
    assert!(output.status.success());

    let urls: Vec<String> = serde_json::from_slice(&output.stdout)?;
    assert_eq!(
        urls,
        [
            "/",
            "/manifest.webmanifest",
            "/howto/android-update",
            "/howto/ios-screenshot",
        ]
    );
    Ok(())
}

fn howto_bin() -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Ok(bin) = std::env::var("CARGO_BIN_EXE_howto") {
        return Ok(PathBuf::from(bin));
    }

    let mut path = std::env::current_exe()?;
    path.pop();
    if path.ends_with("deps") {
        path.pop();
    }
    path.push("howto");

    if cfg!(windows) {
        path.set_extension("exe");
    }

    Ok(path)
}
