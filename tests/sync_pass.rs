use std::error::Error;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

use assetsync::errors::SyncError;
use assetsync::sync::compute_file_digest;
use assetsync::sync::synchronizer::AssetSynchronizer;

type TestResult = Result<(), Box<dyn Error>>;

fn assets(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn digests_match(a: &Path, b: &Path) -> TestResult {
    assert_eq!(compute_file_digest(a)?, compute_file_digest(b)?);
    Ok(())
}

#[test]
fn bootstrap_copies_all_assets_into_empty_destination() -> TestResult {
    let dir = tempdir()?;
    let src = dir.path().join("src");
    let dist = dir.path().join("dist");
    fs::create_dir_all(&src)?;

    fs::write(src.join("index.html"), "<html></html>")?;
    fs::write(src.join("index.css"), "body {}")?;
    fs::write(src.join("favicon.png"), [0x89u8, 0x50, 0x4e, 0x47])?;

    let names = assets(&["index.html", "index.css", "favicon.png"]);
    let sync = AssetSynchronizer::new(&src, &dist, &names);
    let report = sync.initial_sync();

    assert_eq!(report.copied, names);
    assert!(report.unchanged.is_empty());
    assert!(report.is_clean());

    for name in &names {
        digests_match(&src.join(name), &dist.join(name))?;
    }

    Ok(())
}

#[test]
fn second_pass_with_unchanged_inputs_copies_nothing() -> TestResult {
    let dir = tempdir()?;
    let src = dir.path().join("src");
    let dist = dir.path().join("dist");
    fs::create_dir_all(&src)?;
    fs::write(src.join("index.html"), "<html></html>")?;

    let sync = AssetSynchronizer::new(&src, &dist, &assets(&["index.html"]));

    let first = sync.initial_sync();
    assert_eq!(first.copied, vec!["index.html".to_string()]);

    let second = sync.initial_sync();
    assert!(second.copied.is_empty());
    assert_eq!(second.unchanged, vec!["index.html".to_string()]);
    assert!(second.is_clean());

    Ok(())
}

#[test]
fn identical_content_at_destination_is_not_recopied() -> TestResult {
    let dir = tempdir()?;
    let src = dir.path().join("src");
    let dist = dir.path().join("dist");
    fs::create_dir_all(&src)?;
    fs::create_dir_all(&dist)?;

    // Same bytes written separately, so names match but timestamps differ.
    fs::write(src.join("app.css"), ".a { color: red }")?;
    fs::write(dist.join("app.css"), ".a { color: red }")?;

    let sync = AssetSynchronizer::new(&src, &dist, &assets(&["app.css"]));
    let report = sync.initial_sync();

    assert!(report.copied.is_empty());
    assert_eq!(report.unchanged, vec!["app.css".to_string()]);

    Ok(())
}

#[test]
fn missing_source_is_isolated_from_other_assets() -> TestResult {
    let dir = tempdir()?;
    let src = dir.path().join("src");
    let dist = dir.path().join("dist");
    fs::create_dir_all(&src)?;

    fs::write(src.join("a.html"), "a")?;
    fs::write(src.join("c.png"), "c")?;
    // b.css is deliberately never created.

    let sync = AssetSynchronizer::new(&src, &dist, &assets(&["a.html", "b.css", "c.png"]));
    let report = sync.initial_sync();

    assert_eq!(
        report.copied,
        vec!["a.html".to_string(), "c.png".to_string()]
    );
    assert_eq!(report.failures.len(), 1);
    assert!(matches!(
        report.failures[0],
        SyncError::SourceUnreadable { .. }
    ));
    assert_eq!(report.failures[0].asset(), "b.css");

    digests_match(&src.join("a.html"), &dist.join("a.html"))?;
    digests_match(&src.join("c.png"), &dist.join("c.png"))?;

    Ok(())
}

#[test]
fn nested_asset_gets_its_parent_directories_created() -> TestResult {
    let dir = tempdir()?;
    let src = dir.path().join("src");
    let dist = dir.path().join("dist");
    fs::create_dir_all(src.join("css/themes"))?;
    fs::write(src.join("css/themes/dark.css"), "body { background: #000 }")?;

    let sync = AssetSynchronizer::new(&src, &dist, &assets(&["css/themes/dark.css"]));
    let report = sync.initial_sync();

    assert_eq!(report.copied, vec!["css/themes/dark.css".to_string()]);
    digests_match(
        &src.join("css/themes/dark.css"),
        &dist.join("css/themes/dark.css"),
    )?;

    Ok(())
}

#[test]
fn failed_destination_write_is_isolated_from_other_assets() -> TestResult {
    let dir = tempdir()?;
    let src = dir.path().join("src");
    let dist = dir.path().join("dist");
    fs::create_dir_all(src.join("locked"))?;
    fs::create_dir_all(&dist)?;

    fs::write(src.join("a.html"), "a")?;
    fs::write(src.join("locked/b.css"), "b")?;
    fs::write(src.join("c.png"), "c")?;

    // A plain file occupies the path b.css needs as its parent directory,
    // so that asset's copy fails even when running as root.
    fs::write(dist.join("locked"), "not a directory")?;

    let sync = AssetSynchronizer::new(&src, &dist, &assets(&["a.html", "locked/b.css", "c.png"]));
    let report = sync.initial_sync();

    assert_eq!(
        report.copied,
        vec!["a.html".to_string(), "c.png".to_string()]
    );
    assert_eq!(report.failures.len(), 1);
    assert!(matches!(
        report.failures[0],
        SyncError::DestinationWrite { .. }
    ));
    assert_eq!(report.failures[0].asset(), "locked/b.css");

    digests_match(&src.join("a.html"), &dist.join("a.html"))?;
    digests_match(&src.join("c.png"), &dist.join("c.png"))?;

    Ok(())
}

#[test]
fn failed_rename_leaves_existing_destination_intact() -> TestResult {
    let dir = tempdir()?;
    let src = dir.path().join("src");
    let dist = dir.path().join("dist");
    fs::create_dir_all(&src)?;
    fs::write(src.join("bundle.js"), "var app = 1")?;

    // A non-empty directory sits where the destination file belongs; the
    // temp file is written fine but the final rename cannot succeed.
    fs::create_dir_all(dist.join("bundle.js"))?;
    fs::write(dist.join("bundle.js/keep.txt"), "precious")?;

    let sync = AssetSynchronizer::new(&src, &dist, &assets(&["bundle.js"]));
    let report = sync.initial_sync();

    assert_eq!(report.failures.len(), 1);
    assert!(matches!(
        report.failures[0],
        SyncError::DestinationWrite { .. }
    ));

    // The previous destination content survived the failed copy, and the
    // temp file was cleaned up.
    assert_eq!(fs::read(dist.join("bundle.js/keep.txt"))?, b"precious");
    let leftovers: Vec<_> = fs::read_dir(&dist)?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name() != "bundle.js")
        .collect();
    assert!(leftovers.is_empty());

    Ok(())
}

#[test]
fn overwritten_destination_is_repaired_on_next_pass() -> TestResult {
    let dir = tempdir()?;
    let src = dir.path().join("src");
    let dist = dir.path().join("dist");
    fs::create_dir_all(&src)?;
    fs::write(src.join("index.html"), "<html>good</html>")?;

    let sync = AssetSynchronizer::new(&src, &dist, &assets(&["index.html"]));
    sync.initial_sync();

    // Something else clobbers the mirror; the next pass restores it.
    fs::write(dist.join("index.html"), "<html>stale</html>")?;
    let report = sync.initial_sync();

    assert_eq!(report.copied, vec!["index.html".to_string()]);
    digests_match(&src.join("index.html"), &dist.join("index.html"))?;

    Ok(())
}
