//! Template resolution engine.
//!
//! Views are plain text files containing two kinds of directives:
//!
//! ```text
//! <h1>(:= page.title:)</h1>
//! (:include partials/footer.html:)
//! ```
//!
//! `(:= key.path:)` is replaced with a value from the view's [`DataContext`] and
//! `(:include path:)` with the fully resolved content of another view path (a file
//! or a whole directory). There are no conditionals, loops or expressions.
//!
//! # Modules
//!
//! - [`scanner`] - finds and classifies directives, substituting variables as it goes
//! - [`context`] - the data context and dotted key-path resolution
//! - [`cache`] - processed file content keyed by path and modification time
//! - [`embed`] - exposes the data context to client-side scripts
//! - [`loader`] - the recursive, cycle-safe include resolver
//!
//! # Failure Model
//!
//! A load either returns the complete text or the first I/O error. Unresolvable
//! variables and unknown directives are logged and left verbatim in the output.

pub mod cache;
pub mod context;
pub mod embed;
pub mod loader;
pub mod scanner;

pub use cache::{CacheKey, ResolutionCache, SeenSet};
pub use context::{DataContext, Resolution, stringify};
pub use embed::{EmbedOptions, embed_context};
pub use loader::{TemplateLoader, splice_all};
pub use scanner::{Directive, ScanOutcome, TagScanner};
