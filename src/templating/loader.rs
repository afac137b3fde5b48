//! Recursive view loading.
//!
//! A load walks the requested path, and for every file (in walk order, one at a
//! time):
//!
//! 1. skips it if this file version was already expanded in the current chain
//! 2. takes its processed content from the cache, or reads, processes and caches it
//! 3. strips comments and embeds the context snapshot
//! 4. scans directives, substituting variables
//! 5. loads every included path and splices the result over each copy of the tag
//!
//! The per-file results are concatenated in walk order. The first I/O failure
//! aborts the whole load.

use futures::future::{BoxFuture, FutureExt};
use std::sync::Arc;

use super::cache::{CacheKey, ResolutionCache, SeenSet};
use super::context::DataContext;
use super::embed::{EmbedOptions, embed_context};
use super::scanner::{Directive, TagScanner};
use crate::config::ViewConfig;
use crate::core::ViewError;
use crate::processing::ContentProcessor;
use crate::utils::fs::{DirectoryWalker, FileEntry, FileReader, FsReader, FsWalker, RootResolver};

/// Replace every occurrence of `tag` in `text` with `replacement`.
pub fn splice_all(text: &str, tag: &str, replacement: &str) -> String {
    if text.contains(tag) {
        text.replace(tag, replacement)
    } else {
        text.to_string()
    }
}

/// Resolves views against a shared [`ResolutionCache`].
pub struct TemplateLoader<R = FsReader, W = FsWalker> {
    cache: Arc<ResolutionCache>,
    reader: R,
    walker: W,
    processor: ContentProcessor,
    resolver: RootResolver,
    embed: EmbedOptions,
    max_substitutions: usize,
}

impl<R: FileReader, W: DirectoryWalker> TemplateLoader<R, W> {
    pub fn new(
        config: &ViewConfig,
        cache: Arc<ResolutionCache>,
        reader: R,
        walker: W,
    ) -> Result<Self, ViewError> {
        config.validate()?;
        Ok(Self {
            cache,
            reader,
            walker,
            processor: ContentProcessor::new(config.minify),
            resolver: RootResolver::new(&config.root)?,
            embed: EmbedOptions::from_config(config)?,
            max_substitutions: config.max_substitutions,
        })
    }

    pub fn cache(&self) -> &Arc<ResolutionCache> {
        &self.cache
    }

    pub fn resolver(&self) -> &RootResolver {
        &self.resolver
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    /// Resolve the view at `view_path` (relative to the root) to its final text.
    ///
    /// `seen` and `context` are shared by every nested include of one top-level load.
    pub fn load<'a>(
        &'a self,
        view_path: &'a str,
        seen: &'a mut SeenSet,
        context: &'a DataContext,
    ) -> BoxFuture<'a, Result<String, ViewError>> {
        async move {
            let path = self.resolver.resolve(view_path);
            tracing::debug!("Loading view {}", path.display());

            let entries = self.walker.walk(&path).await?;
            let mut output = String::new();
            for entry in &entries {
                output.push_str(&self.resolve_file(entry, seen, context).await?);
            }
            Ok(output)
        }
        .boxed()
    }

    async fn resolve_file(
        &self,
        entry: &FileEntry,
        seen: &mut SeenSet,
        context: &DataContext,
    ) -> Result<String, ViewError> {
        let key = CacheKey::new(&entry.path, entry.modified_millis);
        if !seen.insert(key.clone()) {
            tracing::debug!("File already included [{}]: ignored", key);
            return Ok(String::new());
        }

        let content = self.fetch(entry, key).await?;
        let embedded = embed_context(&content, context, &self.embed);
        let outcome = TagScanner::new(context, self.max_substitutions).scan(embedded);

        let mut text = outcome.text;
        for directive in &outcome.includes {
            let Directive::Include { tag, path } = directive else {
                continue;
            };
            let included = self.load(path, seen, context).await?;
            text = splice_all(&text, tag, &included);
        }
        Ok(text)
    }

    /// Processed content of `entry`, read from disk only on a cache miss.
    async fn fetch(&self, entry: &FileEntry, key: CacheKey) -> Result<Arc<str>, ViewError> {
        if let Some(content) = self.cache.get(&key) {
            tracing::debug!("View output data found in cache: {}", key);
            return Ok(content);
        }

        let raw = self.reader.read(&entry.path).await?;
        let processed = self.processor.process(&entry.path, raw);

        tracing::debug!("View output data stored in cache: {}", key);
        Ok(self.cache.put(key, processed))
    }

    /// Walk `view_path` and cache every file's processed content without resolving it.
    ///
    /// Returns the number of files visited.
    pub async fn preload(&self, view_path: &str) -> Result<usize, ViewError> {
        let path = self.resolver.resolve(view_path);
        tracing::debug!("Preloading view files under {}", path.display());

        let entries = self.walker.walk(&path).await?;
        for entry in &entries {
            let key = CacheKey::new(&entry.path, entry.modified_millis);
            self.fetch(entry, key).await?;
        }
        Ok(entries.len())
    }
}
