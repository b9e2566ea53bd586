//! Configuration files driving the rewrite pipeline.

use std::fs;

use missive::{Config, ElementKind, Error, Rewriter};
use tempfile::TempDir;

const CONFIG: &str = r#"
base_url = "https://news.example.org/app/"
kinds = ["img", "a", "css"]
template_dir = "templates/newsletter"

[unsecured]
base_url = "https://public.example.org"
folder_path = "/app/secure/img"
folder = "pubimg"

[virtual_hosts]
intranet = "https://intra.example.org/"
"#;

fn write_config(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("newsletter.toml");
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_load_and_rewrite() {
    let dir = TempDir::new().unwrap();
    let config = Config::load(write_config(&dir, CONFIG)).unwrap();

    assert_eq!(
        config.kinds,
        vec![ElementKind::Img, ElementKind::A, ElementKind::Css]
    );
    assert_eq!(
        config.virtual_host_base_url("intranet"),
        Some("https://intra.example.org/")
    );
    assert_eq!(config.virtual_host_base_url("extranet"), None);
    assert_eq!(
        config.template_path(Some("issue.html")).as_deref(),
        Some("templates/newsletter/issue.html")
    );

    let rewriter = Rewriter::from_config(&config).unwrap();
    let html = concat!(
        r#"<img src="secure/img/chart.png">"#,
        r#"<a href="archive.html">archive</a>"#,
        r#"<form action="subscribe.jsp"></form>"#,
    );
    assert_eq!(
        rewriter.rewrite(html),
        concat!(
            r#"<img src="https://public.example.org/pubimg/chart.png">"#,
            r#"<a href="https://news.example.org/app/archive.html">archive</a>"#,
            // Forms are not in the configured kinds.
            r#"<form action="subscribe.jsp"></form>"#,
        )
    );
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let result = Config::load(dir.path().join("absent.toml"));
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn test_missing_base_url() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "kinds = [\"img\"]\n");
    assert!(matches!(Config::load(path), Err(Error::Config(_))));
}

#[test]
fn test_unknown_kind_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "base_url = \"https://news.example.org/\"\nkinds = [\"video\"]\n",
    );
    assert!(matches!(Config::load(path), Err(Error::Config(_))));
}

#[test]
fn test_invalid_mirror_fails_before_rewriting() {
    let mut config = Config::from_toml_str(CONFIG).unwrap();
    if let Some(unsecured) = config.unsecured.as_mut() {
        unsecured.folder = "/".to_string();
    }
    assert!(matches!(
        Rewriter::from_config(&config),
        Err(Error::MissingConfig(_))
    ));
}
