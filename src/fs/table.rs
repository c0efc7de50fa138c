//! File table implementation
//!
//! BTreeMap of names to chain heads, plus the allocator that owns the chains.

use std::collections::BTreeMap;

use crate::disk::{ClusterAllocator, ClusterId, MAX_FILES, MAX_NAME_LEN};
use crate::error::{ChainFsError, Result};
use crate::journal::{EventKind, Recorder};

/// Cut `name` to at most `MAX_NAME_LEN` bytes, on a char boundary
pub fn truncate_name(name: &str) -> &str {
    if name.len() <= MAX_NAME_LEN {
        return name;
    }
    let mut end = MAX_NAME_LEN;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}

/// Directory of files and their cluster chains
///
/// Every operation taking a name truncates it first, so a long name always
/// refers to the same entry. A `None` head means the file has no content.
#[derive(Debug, Default)]
pub struct FileTable {
    entries: BTreeMap<String, Option<ClusterId>>,
    clusters: ClusterAllocator,
}

impl FileTable {
    /// Create an empty table with an empty allocator
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble a table from decoded parts (used by the image codec)
    pub(crate) fn from_parts(
        entries: BTreeMap<String, Option<ClusterId>>,
        clusters: ClusterAllocator,
    ) -> Self {
        Self { entries, clusters }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Create an empty file, or empty an existing one
    ///
    /// An existing file keeps its entry; its content is cleared (ClearFile is
    /// recorded when there was any). A new entry records CreateFile.
    pub fn create_file(&mut self, name: &str, rec: &mut Recorder<'_>) -> Result<()> {
        let name = truncate_name(name);

        if self.entries.contains_key(name) {
            self.clear_file_content(name, rec);
            return Ok(());
        }

        if self.entries.len() >= MAX_FILES {
            return Err(ChainFsError::DirectoryFull {
                capacity: MAX_FILES,
            });
        }

        self.entries.insert(name.to_string(), None);
        tracing::debug!(file = name, "File created");
        rec.record(EventKind::CreateFile, name, "");
        Ok(())
    }

    /// Replace the content of a file
    pub fn write_file(&mut self, name: &str, text: &[u8], rec: &mut Recorder<'_>) -> Result<()> {
        self.create_file(name, rec)?;
        self.append_file(name, text, rec)
    }

    /// Append `text` to a file, creating the file when absent
    ///
    /// On `OutOfSpace` the clusters filled so far stay linked to the file and
    /// no AppendToFile event is recorded.
    pub fn append_file(&mut self, name: &str, text: &[u8], rec: &mut Recorder<'_>) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }

        let name = truncate_name(name);
        if !self.entries.contains_key(name) {
            self.create_file(name, rec)?;
        }

        let head = match self.entries.get(name).copied().flatten() {
            Some(head) => head,
            None => {
                let head = self.clusters.allocate()?;
                if let Some(slot) = self.entries.get_mut(name) {
                    *slot = Some(head);
                }
                head
            }
        };

        let mut tail = self.clusters.tail(head);
        let mut rest = text;
        loop {
            let cluster = &mut self.clusters[tail];
            let n = rest.len().min(cluster.free_space());
            let start = cluster.used as usize;
            cluster.data[start..start + n].copy_from_slice(&rest[..n]);
            cluster.used += n as u8;
            rest = &rest[n..];

            if rest.is_empty() {
                break;
            }

            let next = self.clusters.allocate()?;
            self.clusters[tail].next = Some(next);
            tail = next;
        }

        tracing::debug!(file = name, bytes = text.len(), "File appended");
        rec.record(EventKind::AppendToFile, name, text);
        Ok(())
    }

    /// Release a file's chain, keeping the (now empty) entry
    ///
    /// Records ClearFile with the removed content, when there was any.
    pub fn clear_file_content(&mut self, name: &str, rec: &mut Recorder<'_>) {
        let name = truncate_name(name);
        let content = self.read_file(name);

        let Some(slot) = self.entries.get_mut(name) else {
            return;
        };
        let released = self.clusters.release(slot.take());

        if !content.is_empty() {
            tracing::debug!(file = name, clusters = released, "File content cleared");
            rec.record(EventKind::ClearFile, name, content);
        }
    }

    /// Remove a file
    ///
    /// Clears the content first (possibly recording ClearFile), then records
    /// DeleteFile. Absent files are ignored.
    pub fn delete_file(&mut self, name: &str, rec: &mut Recorder<'_>) {
        let name = truncate_name(name);
        if !self.entries.contains_key(name) {
            return;
        }

        self.clear_file_content(name, rec);
        self.entries.remove(name);
        tracing::debug!(file = name, "File deleted");
        rec.record(EventKind::DeleteFile, name, "");
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Content of a file; empty for absent or empty files
    pub fn read_file(&self, name: &str) -> Vec<u8> {
        let head = self.head(name);
        let mut content = Vec::with_capacity(self.file_size(name));
        for (_, cluster) in self.clusters.chain(head) {
            if cluster.next.is_some() {
                content.extend_from_slice(&cluster.data);
            } else {
                content.extend_from_slice(cluster.payload());
            }
        }
        content
    }

    /// Size of a file in bytes
    pub fn file_size(&self, name: &str) -> usize {
        self.clusters
            .chain(self.head(name))
            .map(|(_, cluster)| {
                if cluster.next.is_some() {
                    cluster.data.len()
                } else {
                    cluster.used as usize
                }
            })
            .sum()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(truncate_name(name))
    }

    /// Head cluster of a file, `None` when absent or empty
    pub fn head(&self, name: &str) -> Option<ClusterId> {
        self.entries.get(truncate_name(name)).copied().flatten()
    }

    /// File names in table order
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    /// Entries in table order
    pub fn entries(&self) -> impl ExactSizeIterator<Item = (&str, Option<ClusterId>)> + '_ {
        self.entries.iter().map(|(name, head)| (name.as_str(), *head))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clusters(&self) -> &ClusterAllocator {
        &self.clusters
    }

    /// Number of clusters in use
    pub fn allocated(&self) -> usize {
        self.clusters.allocated()
    }
}
