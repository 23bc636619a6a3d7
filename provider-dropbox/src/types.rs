//! Dropbox API value types
//!
//! Responses are kept as generic JSON (`serde_json::Value`); only the fields
//! the directory walker needs are typed.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use tokio::io::AsyncRead;

use crate::error::Result;

/// Status code plus parsed body of one API call.
///
/// Any status is a reply: 4xx/5xx answers are not errors at this layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply<T = Value> {
    pub status: u16,
    pub body: T,
}

impl<T> Reply<T> {
    pub fn new(status: u16, body: T) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Raw file body returned by `get` and `thumbnails`.
#[derive(Debug, Clone, PartialEq)]
pub struct Download {
    pub status: u16,
    pub bytes: Bytes,
    /// Parsed `x-dropbox-metadata` header; empty object when absent
    pub metadata: Value,
}

/// File body returned by `stream`, read incrementally.
pub struct StreamDownload {
    pub status: u16,
    /// Parsed `x-dropbox-metadata` header; empty object when absent
    pub metadata: Value,
    pub reader: Box<dyn AsyncRead + Send + Unpin>,
}

impl fmt::Debug for StreamDownload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamDownload")
            .field("status", &self.status)
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

/// Collapse a call result into optional parts.
///
/// A transport failure becomes all-`None`, matching callers that only care
/// whether a status came back.
pub trait IntoParts {
    type Parts;

    fn into_parts(self) -> Self::Parts;
}

impl<T> IntoParts for Result<Reply<T>> {
    type Parts = (Option<u16>, Option<T>);

    fn into_parts(self) -> Self::Parts {
        match self {
            Ok(reply) => (Some(reply.status), Some(reply.body)),
            Err(_) => (None, None),
        }
    }
}

impl IntoParts for Result<Download> {
    type Parts = (Option<u16>, Option<Bytes>, Option<Value>);

    fn into_parts(self) -> Self::Parts {
        match self {
            Ok(download) => (
                Some(download.status),
                Some(download.bytes),
                Some(download.metadata),
            ),
            Err(_) => (None, None, None),
        }
    }
}

/// One remote file or folder record.
///
/// Only `path` and `is_dir` are interpreted; every other field is kept
/// verbatim in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub path: String,

    #[serde(default)]
    pub is_dir: bool,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Folder metadata as far as the walker cares.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct FolderContents {
    #[serde(default)]
    pub contents: Vec<Value>,
}

/// Source of a copy operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopySource {
    /// Path inside the configured root
    Path(String),
    /// Reference obtained from `cpref`, possibly from another account
    CopyRef(String),
}

impl From<&str> for CopySource {
    fn from(path: &str) -> Self {
        CopySource::Path(path.to_string())
    }
}

impl From<String> for CopySource {
    fn from(path: String) -> Self {
        CopySource::Path(path)
    }
}

/// Walk options for [`readdir`](crate::DropboxClient::readdir).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkOptions {
    /// Descend into subfolders. Default: true
    pub recursive: bool,
    /// Emit full entries instead of bare paths. Default: false
    pub details: bool,
    /// Pause before every metadata request. Default: 200ms
    pub delay: std::time::Duration,
    /// Cap on concurrent metadata requests. Default: unbounded
    pub max_in_flight: Option<usize>,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            recursive: true,
            details: false,
            delay: std::time::Duration::from_millis(200),
            max_in_flight: None,
        }
    }
}

impl WalkOptions {
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn details(mut self, details: bool) -> Self {
        self.details = details;
        self
    }

    pub fn delay(mut self, delay: std::time::Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn max_in_flight(mut self, limit: usize) -> Self {
        self.max_in_flight = Some(limit);
        self
    }
}

/// One item of a directory walk.
#[derive(Debug, Clone, PartialEq)]
pub enum DirItem {
    Path(String),
    Entry(Entry),
}

impl DirItem {
    pub fn path(&self) -> &str {
        match self {
            DirItem::Path(path) => path,
            DirItem::Entry(entry) => &entry.path,
        }
    }
}

/// Aggregated result of a directory walk.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Listing {
    /// Status of the last metadata request to complete; `None` if it failed
    /// in transport
    pub status: Option<u16>,
    pub items: Vec<DirItem>,
}

impl Listing {
    pub fn paths(&self) -> Vec<&str> {
        self.items.iter().map(DirItem::path).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
