//! Workspace startup
//!
//! Resolves the data file, opens it for reading and writing and hands out the
//! shared store. A file that already existed is loaded once; a file that had
//! to be created gets an empty store saved into it.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;
use thiserror::Error;

use super::{Config, GraphStore};
use crate::domain::Graph;

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("Data file is locked by another process: {0}")]
    Locked(PathBuf),
}

/// An opened data file together with its store
pub struct Workspace {
    root: PathBuf,
    data_path: PathBuf,
    created: bool,
    store: GraphStore<File>,
}

impl Workspace {
    /// Opens the workspace described by `config`
    pub fn open(config: Config) -> Result<Self> {
        let data_path = config.data_path();

        if let Some(parent) = data_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create data directory: {}", parent.display())
                })?;
            }
        }

        let (file, existed) = open_data_file(&data_path)?;

        file.try_lock_exclusive()
            .map_err(|_| WorkspaceError::Locked(data_path.clone()))?;

        let len = file
            .metadata()
            .with_context(|| format!("Failed to stat data file: {}", data_path.display()))?
            .len();
        let created = !existed || len == 0;

        let store = GraphStore::with_options(file, config.store_options());
        if created {
            store
                .save()
                .with_context(|| format!("Failed to initialize data file: {}", data_path.display()))?;
            tracing::info!(path = %data_path.display(), "created data file");
        } else {
            store
                .load()
                .with_context(|| format!("Failed to load data file: {}", data_path.display()))?;
        }

        Ok(Self {
            root: config.root,
            data_path,
            created,
            store,
        })
    }

    /// Name of the application, taken from the working directory
    pub fn app_name(&self) -> String {
        app_name_for(&self.root)
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    /// True when the data file was created (or was empty) on open
    pub fn was_created(&self) -> bool {
        self.created
    }

    pub fn store(&self) -> &GraphStore<File> {
        &self.store
    }

    /// Whether adding an existing dependency edge is skipped
    pub fn dedup_edges(&self) -> bool {
        self.store.options().dedup_edges
    }

    /// Runs `f` on the graph and saves the result, under one lock
    pub fn commit<R>(&self, f: impl FnOnce(&mut Graph) -> R) -> Result<R> {
        self.store
            .commit(f)
            .with_context(|| format!("Failed to save data file: {}", self.data_path.display()))
    }
}

/// Last component of `root`, or the whole path when it has none
pub fn app_name_for(root: &Path) -> String {
    root.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string())
}

fn open_data_file(path: &Path) -> Result<(File, bool)> {
    match OpenOptions::new().read(true).write(true).open(path) {
        Ok(file) => Ok((file, true)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            let file = OpenOptions::new()
                .read(true)
                .write(true)
                .create_new(true)
                .open(path)
                .with_context(|| format!("Failed to create data file: {}", path.display()))?;
            Ok((file, false))
        }
        Err(e) => {
            Err(e).with_context(|| format!("Failed to open data file: {}", path.display()))
        }
    }
}
