//! View resolution against a real file system.

use anyhow::Result;
use serde_json::json;
use tplview_cli::core::ViewError;
use tplview_cli::test_utils::{LogCapture, TemplateTree, init_test_logging};
use tplview_cli::view::ViewEngine;
use tracing::Level;

fn engine(tree: &TemplateTree) -> Result<ViewEngine> {
    let mut config = tree.config();
    config.minify = false;
    Ok(ViewEngine::new(config)?)
}

#[tokio::test]
async fn test_nested_includes_and_variables() -> Result<()> {
    init_test_logging(None);
    let tree = TemplateTree::new()?;
    tree.write("index.html", "<body>(:include partials/nav.html:)<p>(:= page.title:)</p></body>")?;
    tree.write("partials/nav.html", "<nav>(:= user.name:) (:include /partials/badge.html:)</nav>")?;
    tree.write("partials/badge.html", "[(:= user.role:)]")?;

    let mut view = engine(&tree)?.create_view();
    view.assign("page", json!({ "title": "Home" }));
    view.assign("user", json!({ "name": "Ada", "role": "admin" }));

    let html = view.load("index.html").await?;
    assert_eq!(html, "<body><nav>Ada [admin]</nav><p>Home</p></body>");
    Ok(())
}

#[tokio::test]
async fn test_directory_views_concatenate_in_name_order() -> Result<()> {
    let tree = TemplateTree::new()?;
    tree.write("parts/b.html", "B")?;
    tree.write("parts/a.html", "A")?;
    tree.write("parts/c/inner.html", "C")?;

    let html = engine(&tree)?.create_view().load("parts").await?;
    assert_eq!(html, "ABC");
    Ok(())
}

#[tokio::test]
async fn test_repeated_include_is_expanded_once_per_load() -> Result<()> {
    let tree = TemplateTree::new()?;
    tree.write(
        "page.html",
        "(:include item.html:)|(:include item.html:)|(:include  item.html :)",
    )?;
    tree.write("item.html", "x")?;

    let html = engine(&tree)?.create_view().load("page.html").await?;
    // Same tag text spliced everywhere; the second distinct tag finds the file already seen
    assert_eq!(html, "x|x|");
    Ok(())
}

#[tokio::test]
async fn test_include_cycle_terminates() -> Result<()> {
    let tree = TemplateTree::new()?;
    tree.write("a.html", "A[(:include b.html:)]")?;
    tree.write("b.html", "B[(:include a.html:)]")?;

    let html = engine(&tree)?.create_view().load("a.html").await?;
    assert_eq!(html, "A[B[]]");
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn test_symlinked_include_is_the_same_file() -> Result<()> {
    let tree = TemplateTree::new()?;
    tree.write("partials/nav.html", "nav")?;
    std::os::unix::fs::symlink(tree.path("partials"), tree.path("alias"))?;
    tree.write("page.html", "(:include partials/nav.html:)|(:include alias/nav.html:)")?;

    let html = engine(&tree)?.create_view().load("page.html").await?;
    assert_eq!(html, "nav|");
    Ok(())
}

#[tokio::test]
async fn test_each_load_starts_a_fresh_chain() -> Result<()> {
    let tree = TemplateTree::new()?;
    tree.write("a.html", "a")?;
    let view = engine(&tree)?.create_view();

    assert_eq!(view.load("a.html").await?, "a");
    assert_eq!(view.load("a.html").await?, "a");
    Ok(())
}

#[tokio::test]
async fn test_unresolved_and_unknown_tags_stay_in_output() -> Result<()> {
    let tree = TemplateTree::new()?;
    tree.write("a.html", "(:= missing:) (:foo bar:) (:= user.name.first:)")?;

    let mut view = engine(&tree)?.create_view();
    view.assign("user", json!({ "name": "Ada" }));

    // A partial path substitutes the last value reached
    let html = view.load("a.html").await?;
    assert_eq!(html, "(:= missing:) (:foo bar:) Ada");
    Ok(())
}

#[tokio::test]
async fn test_values_are_stringified() -> Result<()> {
    let tree = TemplateTree::new()?;
    tree.write("a.html", "(:= n:)|(:= flag:)|(:= list:)|(:= obj:)")?;

    let mut view = engine(&tree)?.create_view();
    view.assign("n", 42);
    view.assign("flag", false);
    view.assign("list", json!([1, 2]));
    view.assign("obj", json!({ "k": "v" }));

    let html = view.load("a.html").await?;
    assert_eq!(html, "42|false|[1,2]|{\"k\":\"v\"}");
    Ok(())
}

#[tokio::test]
async fn test_context_snapshot_is_embedded_before_head_close() -> Result<()> {
    let tree = TemplateTree::new()?;
    tree.write("page.html", "<html><head><!-- dev note --></head><body>(:= title:)</body></html>")?;

    let mut view = engine(&tree)?.create_view();
    view.assign("title", "Home");

    let html = view.load("page.html").await?;
    assert_eq!(
        html,
        "<html><head><script type=\"text/javascript\">window.viewData = {\"title\":\"Home\"};</script>\n</head><body>Home</body></html>"
    );
    Ok(())
}

#[tokio::test]
async fn test_images_are_inlined_as_data_uris() -> Result<()> {
    let tree = TemplateTree::new()?;
    tree.write("logo.png", [0x89u8, 0x50, 0x4E, 0x47])?;
    tree.write("photo.JPG", [0xFFu8, 0xD8, 0xFF])?;
    tree.write("page.html", "<img src=\"(:include logo.png:)\"><img src=\"(:include photo.JPG:)\">")?;

    let html = engine(&tree)?.create_view().load("page.html").await?;
    assert_eq!(
        html,
        "<img src=\"data:image/png;base64,iVBORw==\"><img src=\"data:image/jpeg;base64,/9j/\">"
    );
    Ok(())
}

#[tokio::test]
async fn test_scripts_are_minified_when_enabled() -> Result<()> {
    let tree = TemplateTree::new()?;
    let source = "// greeting\nfunction hello(name) {\n    return 'hi ' + name;\n}\n";
    tree.write("app.js", source)?;

    let minified = ViewEngine::new(tree.config())?.create_view().load("app.js").await?;
    assert!(!minified.contains("greeting"));
    assert!(minified.contains("function hello(name)"));
    assert!(minified.len() < source.len());

    let plain = engine(&tree)?.create_view().load("app.js").await?;
    assert_eq!(plain, source);
    Ok(())
}

#[tokio::test]
async fn test_missing_include_reports_path() -> Result<()> {
    let tree = TemplateTree::new()?;
    tree.write("a.html", "before (:include nope.html:) after")?;

    let err = engine(&tree)?.create_view().load("a.html").await.unwrap_err();
    assert!(matches!(err, ViewError::Walk { .. }));
    let path = err.path().expect("walk errors carry a path");
    assert!(path.ends_with("nope.html"));
    assert!(err.user_message().contains("does not exist"));
    Ok(())
}

#[tokio::test]
async fn test_invalid_utf8_text_is_decoded_lossily() -> Result<()> {
    let logs = LogCapture::start();
    let tree = TemplateTree::new()?;
    tree.write("page.html", "<link href=\"(:include favicon.ico:)\">")?;
    tree.write("favicon.ico", [0x00u8, 0x00, 0x01, 0x00, 0xFF, 0xFE])?;

    let html = engine(&tree)?.create_view().load("page.html").await?;
    assert_eq!(html, "<link href=\"\u{0}\u{0}\u{1}\u{0}\u{FFFD}\u{FFFD}\">");
    assert!(logs.contains(Level::WARN, "favicon.ico is not valid UTF-8"));
    Ok(())
}

#[tokio::test]
async fn test_minified_script_resolves_directives() -> Result<()> {
    let tree = TemplateTree::new()?;
    tree.write(
        "app.js",
        "// settings\nvar n = (:= count:);\nvar s = 1 .toFixed(2);\n(:include lib/util.js:)\n",
    )?;
    tree.write("lib/util.js", "function util() {\n    return (:= count:) * 2;\n}\n")?;

    let mut view = ViewEngine::new(tree.config())?.create_view();
    view.assign("count", 3);

    let js = view.load("app.js").await?;
    assert_eq!(js, "var n=3;var s=1 .toFixed(2);function util(){return 3*2;}");
    Ok(())
}
