use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::sync::Arc;

use wasi_host_types::types::file::{
    __WASI_FIRST_FREE_FD, __WASI_STDERR_FILENO, __WASI_STDIN_FILENO, __WASI_STDOUT_FILENO,
};
use wasi_host_types::wasi::Fd;
use wasi_host_vfs::{FileSystem, VirtualFile};

/// An open file as seen by the guest.
#[derive(Debug)]
pub struct FileEntry {
    /// Name shown to the guest, e.g. the mount point of a preopen.
    pub name: String,
    pub is_preopen: bool,
    pub is_dir: bool,
    /// The filesystem paths under this entry resolve against, set for preopens.
    pub fs: Option<Arc<dyn FileSystem>>,
    pub file: Box<dyn VirtualFile>,
}

/// Maps descriptors to open files.
///
/// Descriptors 0, 1 and 2 belong to stdio and are only ever placed by
/// [`FileTable::with_stdio`]. Every other insertion takes the lowest free
/// descriptor at or above 3.
#[derive(Debug, Default)]
pub struct FileTable {
    entries: Vec<Option<FileEntry>>,
    free: BinaryHeap<Reverse<Fd>>,
    len: usize,
}

impl FileTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table holding the three stdio entries at 0, 1 and 2.
    pub fn with_stdio(stdin: FileEntry, stdout: FileEntry, stderr: FileEntry) -> Self {
        let mut table = Self::new();
        table
            .entries
            .resize_with(__WASI_FIRST_FREE_FD as usize, || None);
        table.entries[__WASI_STDIN_FILENO as usize] = Some(stdin);
        table.entries[__WASI_STDOUT_FILENO as usize] = Some(stdout);
        table.entries[__WASI_STDERR_FILENO as usize] = Some(stderr);
        table.len = 3;
        table
    }

    /// Adds an entry under the lowest free descriptor at or above 3.
    pub fn insert(&mut self, entry: FileEntry) -> Fd {
        self.len += 1;

        if let Some(Reverse(fd)) = self.free.pop() {
            self.entries[fd as usize] = Some(entry);
            return fd;
        }

        let first_free = __WASI_FIRST_FREE_FD as usize;
        if self.entries.len() < first_free {
            self.entries.resize_with(first_free, || None);
        }
        self.entries.push(Some(entry));
        (self.entries.len() - 1) as Fd
    }

    pub fn get(&self, fd: Fd) -> Option<&FileEntry> {
        self.entries.get(fd as usize)?.as_ref()
    }

    pub fn get_mut(&mut self, fd: Fd) -> Option<&mut FileEntry> {
        self.entries.get_mut(fd as usize)?.as_mut()
    }

    /// Detaches the entry without closing its file.
    pub fn remove(&mut self, fd: Fd) -> Option<FileEntry> {
        let entry = self.entries.get_mut(fd as usize)?.take()?;
        self.len -= 1;
        if fd >= __WASI_FIRST_FREE_FD {
            self.free.push(Reverse(fd));
        }
        Some(entry)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Live entries in ascending descriptor order.
    pub fn iter(&self) -> impl Iterator<Item = (Fd, &FileEntry)> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(fd, entry)| entry.as_ref().map(|entry| (fd as Fd, entry)))
    }

    pub(crate) fn drain(&mut self) -> impl Iterator<Item = (Fd, FileEntry)> + '_ {
        self.len = 0;
        self.free.clear();
        self.entries
            .drain(..)
            .enumerate()
            .filter_map(|(fd, entry)| entry.map(|entry| (fd as Fd, entry)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wasi_host_vfs::NoopFile;

    fn entry(name: &str) -> FileEntry {
        FileEntry {
            name: name.to_string(),
            is_preopen: false,
            is_dir: false,
            fs: None,
            file: Box::new(NoopFile::new(name)),
        }
    }

    fn stdio_table() -> FileTable {
        FileTable::with_stdio(entry("stdin"), entry("stdout"), entry("stderr"))
    }

    #[test]
    fn inserts_start_at_three() {
        let mut table = stdio_table();
        let fds: Vec<Fd> = (0..5).map(|i| table.insert(entry(&i.to_string()))).collect();
        assert_eq!(fds, vec![3, 4, 5, 6, 7]);
        assert_eq!(table.len(), 8);
    }

    #[test]
    fn stdio_sits_at_standard_descriptors() {
        let table = stdio_table();
        let name = |fd| table.get(fd).map(|e| e.name.as_str());
        assert_eq!(name(__WASI_STDIN_FILENO), Some("stdin"));
        assert_eq!(name(__WASI_STDOUT_FILENO), Some("stdout"));
        assert_eq!(name(__WASI_STDERR_FILENO), Some("stderr"));
        assert_eq!(name(__WASI_FIRST_FREE_FD), None);
    }

    #[test]
    fn empty_table_still_skips_stdio() {
        let mut table = FileTable::new();
        assert_eq!(table.insert(entry("a")), 3);
        assert!(table.get(0).is_none());
    }

    #[test]
    fn reuses_lowest_free_descriptor() {
        let mut table = stdio_table();
        for i in 0..5 {
            table.insert(entry(&i.to_string()));
        }

        assert_eq!(table.remove(6).map(|e| e.name), Some("3".to_string()));
        assert_eq!(table.remove(4).map(|e| e.name), Some("1".to_string()));
        assert!(table.remove(4).is_none());

        assert_eq!(table.insert(entry("x")), 4);
        assert_eq!(table.insert(entry("y")), 6);
        assert_eq!(table.insert(entry("z")), 8);
        assert_eq!(table.get(4).map(|e| e.name.as_str()), Some("x"));
    }

    #[test]
    fn removed_stdio_is_not_reissued() {
        let mut table = stdio_table();
        assert!(table.remove(1).is_some());
        assert_eq!(table.insert(entry("a")), 3);
        assert!(table.get(1).is_none());
    }

    #[test]
    fn iter_in_descriptor_order() {
        let mut table = stdio_table();
        table.insert(entry("a"));
        table.insert(entry("b"));
        table.remove(3);

        let names: Vec<(Fd, &str)> = table.iter().map(|(fd, e)| (fd, e.name.as_str())).collect();
        assert_eq!(
            names,
            vec![(0, "stdin"), (1, "stdout"), (2, "stderr"), (4, "b")]
        );
    }

    #[test]
    fn unknown_descriptors() {
        let mut table = stdio_table();
        assert!(table.get(42).is_none());
        assert!(table.get_mut(42).is_none());
        assert!(table.remove(42).is_none());
        assert_eq!(table.len(), 3);
    }
}
