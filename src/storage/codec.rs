//! JSON codec for the graph store
//!
//! The whole store is written as one document with two top-level maps,
//! `Items` and `Tags`. Saves go to a seekable backing resource: the payload
//! is written from the start and the resource is truncated to the payload
//! length so a shorter save never leaves stale bytes behind.

use std::fs::File;
use std::io::{self, BufReader, Cursor, Read, Seek, SeekFrom, Write};

use serde::Serialize;
use thiserror::Error;

use crate::domain::Graph;

/// Indentation of saved documents
const INDENT: &[u8] = b"    ";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to decode store document: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Failed to encode store document: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("I/O error on store file: {0}")]
    Io(#[from] io::Error),
}

/// A readable, writable, seekable resource the store can be saved to
pub trait Backing: Read + Write + Seek {
    /// Cuts the resource down to `len` bytes
    fn truncate(&mut self, len: u64) -> io::Result<()>;

    /// Pushes written bytes to durable storage
    fn sync(&mut self) -> io::Result<()> {
        self.flush()
    }
}

impl Backing for File {
    fn truncate(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)
    }

    fn sync(&mut self) -> io::Result<()> {
        self.flush()?;
        self.sync_all()
    }
}

impl Backing for Cursor<Vec<u8>> {
    fn truncate(&mut self, len: u64) -> io::Result<()> {
        let len = usize::try_from(len).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        self.get_mut().truncate(len);
        Ok(())
    }
}

/// Serializes the store as an indented document
pub fn encode(graph: &Graph) -> Result<Vec<u8>, StoreError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    graph.serialize(&mut serializer).map_err(StoreError::Encode)?;
    Ok(buf)
}

/// Decodes a complete document
pub fn decode(bytes: &[u8]) -> Result<Graph, StoreError> {
    read_from(bytes)
}

/// Decodes a document from a reader
///
/// Entity names are made to agree with the keys they are stored under.
pub fn read_from<R: Read>(reader: R) -> Result<Graph, StoreError> {
    let mut graph: Graph = serde_json::from_reader(reader).map_err(|e| {
        if e.is_io() {
            StoreError::Io(e.into())
        } else {
            StoreError::Decode(e)
        }
    })?;
    graph.normalize_names();
    Ok(graph)
}

/// Writes the compact document followed by a newline to a plain sink
pub fn write_stream<W: Write>(graph: &Graph, mut writer: W) -> Result<(), StoreError> {
    serde_json::to_writer(&mut writer, graph).map_err(StoreError::Encode)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Saves the store onto a backing resource, replacing its contents
///
/// Returns the number of bytes written.
pub fn save_to<B: Backing>(graph: &Graph, backing: &mut B) -> Result<usize, StoreError> {
    let payload = encode(graph)?;

    backing.seek(SeekFrom::Start(0))?;
    backing.write_all(&payload)?;
    backing.truncate(payload.len() as u64)?;
    backing.sync()?;

    Ok(payload.len())
}

/// Loads the store from the start of a backing resource
pub fn load_from<B: Backing>(backing: &mut B) -> Result<Graph, StoreError> {
    backing.seek(SeekFrom::Start(0))?;
    read_from(BufReader::new(backing))
}
