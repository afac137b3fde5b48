//! Configuration management for the view loader
//!
//! Options live in the `[view]` table of a TOML file, read once at startup.
//!
//! # Lookup Order
//!
//! 1. `--config <FILE>` on the command line
//! 2. The `TPLVIEW_CONFIG` environment variable
//! 3. `tplview.toml` in the working directory
//! 4. Built-in defaults
//!
//! # Options
//!
//! | key               | default      | meaning                                         |
//! |-------------------|--------------|-------------------------------------------------|
//! | `root`            | `.`          | base directory for view and include paths       |
//! | `preloads`        | `[]`         | view roots cached at startup                    |
//! | `minify`          | `true`       | minify `.js` files before caching               |
//! | `context_anchor`  | `</head>`    | insertion point of the data snapshot            |
//! | `client_variable` | `viewData`   | global name the snapshot is assigned to         |
//! | `max_substitutions` | `4096`     | substitution cap for a single scan              |

pub mod view;

pub use view::{CONFIG_ENV_VAR, DEFAULT_CONFIG_FILE, ViewConfig};
