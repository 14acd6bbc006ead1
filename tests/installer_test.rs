//! End-to-end tests for building installer pages.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use airlift::escape::unescape;
use airlift::{Error, FileSpec, PackConfig, build_installer};
use tempfile::TempDir;

/// Lay out `files` under a fresh temp dir and return a config for them.
fn project(files: &[(&str, &str)]) -> (TempDir, PackConfig) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut specs = Vec::new();
    for (name, content) in files {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        specs.push(FileSpec::new(*name, path));
    }
    let config = PackConfig::new()
        .with_files(specs)
        .with_output(dir.path().join("installer.html"));
    (dir, config)
}

/// Pull `(name, cooked content)` pairs back out of a rendered page, the way
/// the page's script sees them.
fn extract_entries(page: &str) -> Vec<(String, String)> {
    let mut entries = Vec::new();
    let mut rest = page;

    while let Some(start) = rest.find("name: ") {
        rest = &rest[start + "name: ".len()..];
        let name_end = rest.find('\n').unwrap();
        let name: String = serde_json::from_str(rest[..name_end].trim_end_matches(',')).unwrap();

        let body_start = rest.find("content: `").unwrap() + "content: `".len();
        rest = &rest[body_start..];

        // The body ends at the first backtick not preceded by an escape.
        let bytes = rest.as_bytes();
        let mut i = 0;
        while bytes[i] != b'`' {
            i += if bytes[i] == b'\\' { 2 } else { 1 };
        }
        let content = unescape(&rest[..i]).trim().to_string();
        entries.push((name, content));
        rest = &rest[i + 1..];
    }

    entries
}

fn dir_listing(dir: &Path) -> Vec<PathBuf> {
    let mut entries: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    entries.sort();
    entries
}

#[test]
fn test_builds_page_with_scenario_entry() {
    let (_dir, config) = project(&[("a.txt", "`back${tick}\\slash`")]);

    let report = build_installer(&config).expect("build failed");
    assert_eq!(report.files, vec!["a.txt".to_string()]);

    let page = fs::read_to_string(&config.output).unwrap();
    assert_eq!(report.bytes, page.len());
    assert_eq!(page.matches("name: \"a.txt\"").count(), 1);
    assert!(page.contains("content: `\n\\`back\\${tick}\\\\slash\\`\n"));
    assert_eq!(
        extract_entries(&page),
        vec![("a.txt".to_string(), "`back${tick}\\slash`".to_string())]
    );
}

#[test]
fn test_page_round_trips_awkward_content() {
    let js = "const t = `Hello ${name}`;\nconst re = /\\d+\\\\/g;\n// </script> in a comment\n";
    let json = "{ \"path\": \"C:\\\\tmp\", \"tpl\": \"\\${x}\" }";
    let readme = "  # Title\n\n```sh\necho `pwd`\n```\n\nUnicode: héllo wörld ✓\n";
    let (_dir, config) = project(&[
        ("package.json", json),
        ("out/extension.js", js),
        ("README.md", readme),
    ]);

    build_installer(&config).unwrap();
    let page = fs::read_to_string(&config.output).unwrap();

    // Exactly one real script end tag: the page's own
    assert_eq!(page.to_ascii_lowercase().matches("</script").count(), 1);

    let entries = extract_entries(&page);
    assert_eq!(
        entries,
        vec![
            ("package.json".to_string(), json.trim().to_string()),
            ("out/extension.js".to_string(), js.trim().to_string()),
            ("README.md".to_string(), readme.trim().to_string()),
        ]
    );
}

#[test]
fn test_comment_and_script_markup_keep_single_script_element() {
    let readme = "Embed like this: <!-- <script src=\"x.js\"> and done\n<SCRIPT>x()</SCRIPT> -->";
    let (_dir, config) = project(&[("README.md", readme)]);

    build_installer(&config).unwrap();
    let page = fs::read_to_string(&config.output).unwrap();
    let lower = page.to_ascii_lowercase();

    // The page's own script element is the only one, and nothing can put the
    // tokenizer into an escaped state before its end tag.
    assert_eq!(lower.matches("<script").count(), 1);
    assert_eq!(lower.matches("</script").count(), 1);
    assert!(!lower.contains("<!--"));
    let end_tag = lower.find("</script>").unwrap();
    assert!(lower[end_tag..].contains("</html>"));
    assert!(!lower[..end_tag].contains("</html>"));

    assert_eq!(
        extract_entries(&page),
        vec![("README.md".to_string(), readme.to_string())]
    );
}

#[test]
fn test_crlf_content_round_trips_through_page() {
    let json = "{\r\n  \"name\": \"demo\"\r\n}\r\n";
    let mixed = "line1\r\nline2 `x` ${y} \\z\rend";
    let (_dir, config) = project(&[("package.json", json), ("mixed.txt", mixed)]);

    build_installer(&config).unwrap();
    let page = fs::read_to_string(&config.output).unwrap();
    assert!(!page.contains('\r'));

    assert_eq!(
        extract_entries(&page),
        vec![
            ("package.json".to_string(), json.trim().to_string()),
            ("mixed.txt".to_string(), mixed.to_string()),
        ]
    );
}

#[test]
fn test_entry_order_follows_config() {
    let names = ["c.txt", "a.txt", "d.txt", "b.txt"];
    let files: Vec<_> = names.iter().map(|n| (*n, *n)).collect();
    let (_dir, config) = project(&files);

    let report = build_installer(&config).unwrap();
    assert_eq!(report.files, names);

    let page = fs::read_to_string(&config.output).unwrap();
    let extracted: Vec<_> = extract_entries(&page).into_iter().map(|(n, _)| n).collect();
    assert_eq!(extracted, names);
}

#[test]
fn test_empty_file_list_still_writes_page() {
    let (_dir, config) = project(&[]);

    let report = build_installer(&config).unwrap();
    assert!(report.files.is_empty());

    let page = fs::read_to_string(&config.output).unwrap();
    assert!(extract_entries(&page).is_empty());
    assert!(!page.contains(airlift::PLACEHOLDER));
}

#[test]
fn test_empty_file_emits_empty_entry() {
    let (_dir, config) = project(&[("empty.txt", ""), ("full.txt", "x")]);

    build_installer(&config).unwrap();
    let page = fs::read_to_string(&config.output).unwrap();
    assert_eq!(
        extract_entries(&page),
        vec![
            ("empty.txt".to_string(), String::new()),
            ("full.txt".to_string(), "x".to_string()),
        ]
    );
}

#[test]
fn test_missing_file_at_any_position_writes_nothing() {
    for missing_at in 0..3 {
        let (dir, mut config) = project(&[("one.txt", "1"), ("two.txt", "2"), ("three.txt", "3")]);
        let missing = dir.path().join("gone.txt");
        config.files[missing_at] = FileSpec::new("gone.txt", missing.clone());
        let before = dir_listing(dir.path());

        match build_installer(&config) {
            Err(Error::MissingFile { path }) => assert_eq!(path, missing),
            other => panic!("expected MissingFile at {missing_at}, got {other:?}"),
        }
        assert!(!config.output.exists());
        assert_eq!(dir_listing(dir.path()), before);
    }
}

#[test]
fn test_missing_file_leaves_existing_output_untouched() {
    let (dir, mut config) = project(&[("one.txt", "1"), ("two.txt", "2"), ("three.txt", "3")]);
    fs::write(&config.output, "previous page").unwrap();
    config.files[1] = FileSpec::new("two.txt", dir.path().join("missing/two.txt"));

    let err = build_installer(&config).unwrap_err();
    assert!(err.to_string().contains("two.txt"));
    assert_eq!(fs::read_to_string(&config.output).unwrap(), "previous page");
}

#[test]
fn test_rebuild_is_byte_identical() {
    let (_dir, config) = project(&[("a.txt", "alpha `a`"), ("b.txt", "beta ${b}")]);

    build_installer(&config).unwrap();
    let first = fs::read(&config.output).unwrap();
    build_installer(&config).unwrap();
    let second = fs::read(&config.output).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_config_file_drives_build() {
    let (dir, _) = project(&[("src/lib.txt", "library")]);
    let config_path = dir.path().join("airlift.json");
    fs::write(
        &config_path,
        r#"{
            "files": [{ "name": "lib.txt", "path": "src/lib.txt" }],
            "output": "dist/page.html",
            "title": "Library & Co"
        }"#,
    )
    .unwrap();

    let config = PackConfig::from_json_file(&config_path)
        .unwrap()
        .resolve_paths(dir.path());
    build_installer(&config).unwrap();

    let page = fs::read_to_string(dir.path().join("dist/page.html")).unwrap();
    assert!(page.contains("<title>Library &amp; Co</title>"));
    assert_eq!(
        extract_entries(&page),
        vec![("lib.txt".to_string(), "library".to_string())]
    );
}

#[test]
fn test_invalid_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(&path, "{ not json").unwrap();

    assert!(matches!(
        PackConfig::from_json_file(&path),
        Err(Error::Config { .. })
    ));
}

#[test]
fn test_cli_builds_default_layout() {
    let (dir, _) = project(&[
        ("package.json", "{ \"name\": \"demo\" }"),
        ("out/extension.js", "exports.activate = () => {};"),
        ("README.md", "# Demo"),
    ]);

    let output = Command::new(env!("CARGO_BIN_EXE_airlift"))
        .arg("--dir")
        .arg(dir.path())
        .output()
        .expect("Failed to run airlift");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(String::from_utf8_lossy(&output.stdout).contains("final_extension_installer.html"));

    let page = fs::read_to_string(dir.path().join("final_extension_installer.html")).unwrap();
    let names: Vec<_> = extract_entries(&page).into_iter().map(|(n, _)| n).collect();
    assert_eq!(names, ["package.json", "extension.js", "README.md"]);
}

#[test]
fn test_cli_reports_missing_file() {
    let (dir, _) = project(&[("package.json", "{}"), ("README.md", "# Demo")]);

    let output = Command::new(env!("CARGO_BIN_EXE_airlift"))
        .arg("--dir")
        .arg(dir.path())
        .arg("--quiet")
        .output()
        .expect("Failed to run airlift");
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("file not found"));
    assert!(stderr.contains("extension.js"));
    assert!(!dir.path().join("final_extension_installer.html").exists());
}

#[test]
fn test_cli_missing_config_is_not_a_source_error() {
    let dir = TempDir::new().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_airlift"))
        .arg("--config")
        .arg(dir.path().join("absent.json"))
        .arg("--quiet")
        .output()
        .expect("Failed to run airlift");
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("absent.json"));
    assert!(!stderr.contains("project root"));
}
