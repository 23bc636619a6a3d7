//! Recursive directory listing on top of `metadata`.

use futures::stream::{FuturesUnordered, StreamExt};
use std::collections::VecDeque;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::connector::DropboxClient;
use crate::error::Result;
use crate::types::{DirItem, Entry, FolderContents, Listing, Reply, WalkOptions};

impl DropboxClient {
    /// List everything below `path`.
    ///
    /// In recursive mode a subfolder is replaced by what it contains, so the
    /// listing holds files (and, without recursion, the immediate
    /// subfolders).
    ///
    /// Each folder costs one `metadata` request, issued after `options.delay`.
    /// Sibling folders are fetched concurrently (bounded by
    /// `options.max_in_flight` when set), so items from different folders may
    /// interleave; within a folder the server order is kept.
    ///
    /// Never fails. A folder whose request fails or whose answer has no
    /// `contents` adds nothing, and the walk continues with the other
    /// branches. [`Listing::status`] is the status of whichever request
    /// finished last, `None` if that one failed in transport.
    #[instrument(skip(self, options), fields(recursive = options.recursive, details = options.details))]
    pub async fn readdir(&self, path: &str, options: &WalkOptions) -> Listing {
        let limit = options.max_in_flight.map(|n| n.max(1));
        let mut listing = Listing::default();
        let mut queued = VecDeque::from([path.to_string()]);
        let mut in_flight = FuturesUnordered::new();
        let mut fetches = 0usize;

        loop {
            while limit.map_or(true, |limit| in_flight.len() < limit) {
                let Some(folder) = queued.pop_front() else {
                    break;
                };
                fetches += 1;
                in_flight.push(self.paced_fetch(folder, options.delay));
            }

            let Some((folder, result)) = in_flight.next().await else {
                break;
            };

            match result {
                Ok(reply) => {
                    listing.status = Some(reply.status);
                    for entry in folder_entries(&folder, reply) {
                        // A descended folder is represented by its contents
                        if entry.is_dir && options.recursive {
                            queued.push_back(entry.path);
                            continue;
                        }
                        listing.items.push(if options.details {
                            DirItem::Entry(entry)
                        } else {
                            DirItem::Path(entry.path)
                        });
                    }
                }
                Err(e) => {
                    warn!(folder = %folder, error = %e, "Skipping folder after transport failure");
                    listing.status = None;
                }
            }
        }

        debug!(fetches, items = listing.items.len(), "Directory walk finished");
        listing
    }

    async fn paced_fetch(&self, folder: String, delay: Duration) -> (String, Result<Reply>) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let result = self.metadata(&folder, None).await;
        (folder, result)
    }
}

fn folder_entries(folder: &str, reply: Reply) -> Vec<Entry> {
    let contents = match serde_json::from_value::<FolderContents>(reply.body) {
        Ok(folder) => folder.contents,
        Err(_) => {
            debug!(folder, status = reply.status, "No folder contents in reply");
            return Vec::new();
        }
    };

    contents
        .into_iter()
        .filter_map(|child| match serde_json::from_value::<Entry>(child) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(folder, error = %e, "Ignoring child without a path");
                None
            }
        })
        .collect()
}
