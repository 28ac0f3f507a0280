//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting. Every command opens the
//! data file, performs one store operation and saves after anything that
//! may have changed the store.
//!
//! ## Command Groups
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Core | Data file setup | `init`, `name` |
//! | Item | Item graph edits | `item put`, `item dep`, `item rename` |
//! | Tag | Tag graph edits | `tag put`, `tag dep`, `tag remove` |
//! | View | Rankings and projections | `rank`, `tree`, `vis`, `dot`, `export` |
//!
//! ## Output Formats
//!
//! All commands support the `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! The default can be changed with `default_format` in the global config.
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output, or set `PRIORITIZE_LOG` to a
//! tracing filter:
//! ```bash
//! prioritize --verbose rank
//! PRIORITIZE_LOG=prioritize=trace prioritize item dep a b
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod item;
mod output;
mod tag;
mod view;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
