//! Tests for the `tplview` binary.

use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use serial_test::serial;
use std::path::PathBuf;
use tplview_cli::config::{CONFIG_ENV_VAR, ViewConfig};
use tplview_cli::test_utils::TemplateTree;

fn tplview(tree: &TemplateTree) -> Command {
    let mut cmd = Command::cargo_bin("tplview").unwrap();
    cmd.current_dir(tree.root()).env_remove(CONFIG_ENV_VAR).env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_render_prints_resolved_view() -> Result<()> {
    let tree = TemplateTree::new()?;
    tree.write("views/page.html", "Hi (:= user.name:)! (:include /views/tail.html:)")?;
    tree.write("views/tail.html", "n=(:= n:)")?;
    tree.write("data.json", r#"{ "user": { "name": "Ada" }, "n": 1 }"#)?;

    tplview(&tree)
        .args(["render", "views/page.html", "--data", "data.json", "--set", "n=2"])
        .assert()
        .success()
        .stdout("Hi Ada! n=2");
    Ok(())
}

#[test]
fn test_render_writes_output_file() -> Result<()> {
    let tree = TemplateTree::new()?;
    tree.write("page.html", "(:= title:)")?;

    tplview(&tree)
        .args(["render", "page.html", "--set", "title=Home", "--output", "out.html"])
        .assert()
        .success()
        .stdout("");

    assert_eq!(std::fs::read_to_string(tree.path("out.html"))?, "Home");
    Ok(())
}

#[test]
fn test_render_uses_config_file_in_working_directory() -> Result<()> {
    let tree = TemplateTree::new()?;
    tree.write("tplview.toml", "[view]\nroot = \"site\"\nclient_variable = \"pageData\"\n")?;
    tree.write("site/index.html", "<head></head>")?;

    tplview(&tree)
        .args(["render", "index.html", "--set", "a=1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("window.pageData = {\"a\":1};"));
    Ok(())
}

#[test]
fn test_root_flag_overrides_config() -> Result<()> {
    let tree = TemplateTree::new()?;
    tree.write("tplview.toml", "[view]\nroot = \"site\"\n")?;
    tree.write("other/index.html", "other")?;

    tplview(&tree)
        .args(["--root", "other", "render", "index.html"])
        .assert()
        .success()
        .stdout("other");
    Ok(())
}

#[test]
fn test_missing_view_exits_with_error() -> Result<()> {
    let tree = TemplateTree::new()?;

    tplview(&tree)
        .args(["render", "nope.html"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("nope.html"))
        .stderr(predicate::str::contains("suggestion"));
    Ok(())
}

#[test]
fn test_invalid_data_file_is_reported() -> Result<()> {
    let tree = TemplateTree::new()?;
    tree.write("page.html", "x")?;
    tree.write("data.json", "[1, 2]")?;

    tplview(&tree)
        .args(["render", "page.html", "--data", "data.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be a JSON object"));
    Ok(())
}

#[test]
fn test_unknown_config_key_is_rejected() -> Result<()> {
    let tree = TemplateTree::new()?;
    tree.write("tplview.toml", "[view]\nroots = \"typo\"\n")?;

    tplview(&tree).args(["preload"]).assert().failure().code(1);
    Ok(())
}

#[test]
fn test_preload_reports_cached_files() -> Result<()> {
    let tree = TemplateTree::new()?;
    tree.write("tplview.toml", "[view]\npreloads = [\"pages\", \"partials\"]\n")?;
    tree.write("pages/a.html", "a")?;
    tree.write("pages/b.html", "b")?;
    tree.write("partials/c.html", "c")?;

    tplview(&tree)
        .arg("preload")
        .assert()
        .success()
        .stdout(predicate::str::contains("3 file(s) from 2 preload root(s)"));
    Ok(())
}

#[test]
fn test_preload_without_roots() -> Result<()> {
    let tree = TemplateTree::new()?;

    tplview(&tree)
        .arg("preload")
        .assert()
        .success()
        .stdout(predicate::str::contains("No preload roots configured"));
    Ok(())
}

#[test]
fn test_config_env_var_is_honoured_by_binary() -> Result<()> {
    let tree = TemplateTree::new()?;
    let config = tree.write("conf/site.toml", "[view]\nroot = \"../views\"\n")?;
    tree.write("views/index.html", "from env")?;

    tplview(&tree)
        .env(CONFIG_ENV_VAR, &config)
        .args(["render", "index.html"])
        .assert()
        .success()
        .stdout("from env");
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_load_with_optional_reads_env_var() -> Result<()> {
    let tree = TemplateTree::new()?;
    let config = tree.write("site.toml", "[view]\nroot = \"views\"\nminify = false\n")?;

    // SAFETY: serialized with every other test touching the process environment
    unsafe { std::env::set_var(CONFIG_ENV_VAR, &config) };
    let loaded = ViewConfig::load_with_optional(None).await;
    unsafe { std::env::remove_var(CONFIG_ENV_VAR) };

    let loaded = loaded?;
    assert_eq!(loaded.root, tree.root().join("views"));
    assert!(!loaded.minify);

    // An explicit path wins over the environment
    let explicit = tree.write("explicit.toml", "[view]\nroot = \"/abs\"\n")?;
    let loaded = ViewConfig::load_with_optional(Some(explicit)).await?;
    assert_eq!(loaded.root, PathBuf::from("/abs"));
    Ok(())
}
