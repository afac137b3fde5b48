//! Cache reuse across loads, engines and file modifications.

use anyhow::Result;
use std::sync::Arc;
use tplview_cli::templating::ResolutionCache;
use tplview_cli::test_utils::{CountingReader, TemplateTree};
use tplview_cli::utils::fs::FsWalker;
use tplview_cli::view::ViewEngine;

fn counting_engine(tree: &TemplateTree) -> Result<ViewEngine<CountingReader, FsWalker>> {
    Ok(ViewEngine::with_collaborators(tree.config(), CountingReader::default(), FsWalker)?)
}

#[tokio::test]
async fn test_unchanged_files_are_read_once() -> Result<()> {
    let tree = TemplateTree::new()?;
    tree.write("page.html", "<h1>(:= title:)</h1>(:include footer.html:)")?;
    tree.write("footer.html", "<footer/>")?;
    let engine = counting_engine(&tree)?;

    for title in ["One", "Two", "Three"] {
        let mut view = engine.create_view();
        view.assign("title", title);
        assert_eq!(view.load("page.html").await?, format!("<h1>{title}</h1><footer/>"));
    }

    assert_eq!(engine.reader().reads(&tree.path("page.html")), 1);
    assert_eq!(engine.reader().reads(&tree.path("footer.html")), 1);
    assert_eq!(engine.cache().len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_modified_file_is_read_again() -> Result<()> {
    let tree = TemplateTree::new()?;
    tree.write("page.html", "old")?;
    let engine = counting_engine(&tree)?;
    let view = engine.create_view();

    assert_eq!(view.load("page.html").await?, "old");

    tree.write("page.html", "new")?;
    tree.touch("page.html", 60)?;
    assert_eq!(view.load("page.html").await?, "new");

    assert_eq!(engine.reader().reads(&tree.path("page.html")), 2);
    // The stale entry stays; keys carry the modification time
    assert_eq!(engine.cache().len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_setup_preloads_configured_roots() -> Result<()> {
    let tree = TemplateTree::new()?;
    tree.write("pages/index.html", "index (:include partials/nav.html:)")?;
    tree.write("pages/about.html", "about")?;
    tree.write("partials/nav.html", "nav")?;

    let mut config = tree.config();
    config.preloads = vec!["pages".to_string(), "/partials/".to_string()];
    let engine = ViewEngine::with_collaborators(config, CountingReader::default(), FsWalker)?;

    assert_eq!(engine.setup().await?, 3);
    assert_eq!(engine.reader().total_reads(), 3);

    let html = engine.create_view().load("pages/index.html").await?;
    assert_eq!(html, "index nav");
    assert_eq!(engine.reader().total_reads(), 3);
    Ok(())
}

#[tokio::test]
async fn test_setup_caches_binary_assets() -> Result<()> {
    let tree = TemplateTree::new()?;
    tree.write("assets/app.css", "body {\n}\n")?;
    tree.write("assets/favicon.ico", [0x00u8, 0x00, 0x01, 0x00, 0xFF, 0xFE])?;

    let mut config = tree.config();
    config.preloads = vec!["assets".to_string()];
    let engine = ViewEngine::new(config)?;

    assert_eq!(engine.setup().await?, 2);
    assert_eq!(engine.cache().len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_setup_fails_on_missing_preload_root() -> Result<()> {
    let tree = TemplateTree::new()?;
    let mut config = tree.config();
    config.preloads = vec!["does-not-exist".to_string()];

    let engine = ViewEngine::new(config)?;
    assert!(engine.setup().await.is_err());
    Ok(())
}

#[tokio::test]
async fn test_engines_can_share_a_cache() -> Result<()> {
    let tree = TemplateTree::new()?;
    tree.write("a.html", "shared")?;
    let cache = Arc::new(ResolutionCache::new());

    let first =
        ViewEngine::with_cache(tree.config(), Arc::clone(&cache), CountingReader::default(), FsWalker)?;
    let second =
        ViewEngine::with_cache(tree.config(), Arc::clone(&cache), CountingReader::default(), FsWalker)?;

    first.create_view().load("a.html").await?;
    second.create_view().load("a.html").await?;

    assert_eq!(first.reader().total_reads(), 1);
    assert_eq!(second.reader().total_reads(), 0);
    let (hits, misses) = cache.stats();
    assert_eq!((hits, misses), (1, 1));
    Ok(())
}

#[tokio::test]
async fn test_concurrent_loads_share_one_engine() -> Result<()> {
    let tree = TemplateTree::new()?;
    tree.write("page.html", "(:= n:)")?;
    let engine = ViewEngine::new(tree.config())?;

    let mut handles = Vec::new();
    for n in 0..8 {
        let engine = engine.clone();
        handles.push(tokio::spawn(async move {
            let mut view = engine.create_view();
            view.assign("n", n);
            view.load("page.html").await
        }));
    }

    for (n, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.await??, n.to_string());
    }
    assert_eq!(engine.cache().len(), 1);
    Ok(())
}
