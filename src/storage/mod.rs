//! # Storage Layer
//!
//! Persistence for the prioritize graph store.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Items and tags | JSON document (`Items`, `Tags`) | `prioritize.json` (configurable) |
//! | Local config | TOML | `./prioritize.toml` |
//! | Global config | TOML | `~/.config/prioritize/config.toml` |
//!
//! ## Concurrency Safety
//!
//! - [`GraphStore`] serializes every operation through one mutex
//! - [`Workspace`] holds an exclusive file lock (`fs2`) on the data file
//! - Saves rewrite the file in place and truncate it to the payload length
//!
//! ## Key Types
//!
//! - [`Workspace`] - Entry point: resolves, opens and loads the data file
//! - [`GraphStore`] - The shared store over a [`Backing`] resource
//! - [`Config`] - Global and local configuration

mod codec;
mod config;
mod store;
mod workspace;

pub use codec::{decode, encode, load_from, read_from, save_to, write_stream, Backing, StoreError};
pub use config::{
    Config, ConfigError, GlobalConfig, LocalConfig, OutputFormat, DEFAULT_DATA_FILE,
    LOCAL_CONFIG_FILE,
};
pub use store::{GraphStore, StoreOptions};
pub use workspace::{app_name_for, Workspace, WorkspaceError};
