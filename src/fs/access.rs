use std::cell::OnceCell;
use std::fs::{self, File, FileType, Metadata};
use std::io::Read;
use std::os::unix::fs::{FileTypeExt, MetadataExt};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::PathError;

/// Type of filesystem node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Directory,
    Regular,
    Symlink,
    CharDevice,
    BlockDevice,
    Fifo,
    Socket,
    Unknown,
}

impl FileKind {
    fn from_file_type(ft: FileType) -> Self {
        if ft.is_dir() {
            FileKind::Directory
        } else if ft.is_file() {
            FileKind::Regular
        } else if ft.is_symlink() {
            FileKind::Symlink
        } else if ft.is_char_device() {
            FileKind::CharDevice
        } else if ft.is_block_device() {
            FileKind::BlockDevice
        } else if ft.is_fifo() {
            FileKind::Fifo
        } else if ft.is_socket() {
            FileKind::Socket
        } else {
            FileKind::Unknown
        }
    }

    /// Human readable description used for paths that cannot be previewed.
    pub fn description(self) -> &'static str {
        match self {
            FileKind::Directory => "directory",
            FileKind::Regular => "regular file",
            FileKind::Symlink => "symbolic link",
            FileKind::CharDevice => "character special device file",
            FileKind::BlockDevice => "block special device file",
            FileKind::Fifo => "FIFO (named pipe)",
            FileKind::Socket => "socket",
            FileKind::Unknown => "unknown file type",
        }
    }
}

/// Result of stat-ing a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stat {
    pub kind: FileKind,
    pub mode: u32,
    pub size: u64,
    pub mtime: Option<SystemTime>,
    pub uid: u32,
    pub gid: u32,
    pub nlink: u64,
    pub inode: u64,
}

impl Stat {
    pub fn from_metadata(meta: &Metadata) -> Self {
        Self {
            kind: FileKind::from_file_type(meta.file_type()),
            mode: meta.mode(),
            size: meta.len(),
            mtime: meta.modified().ok(),
            uid: meta.uid(),
            gid: meta.gid(),
            nlink: meta.nlink(),
            inode: meta.ino(),
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == FileKind::Directory
    }

    pub fn is_executable(&self) -> bool {
        self.mode & 0o111 != 0
    }
}

/// One entry of a directory listing.
///
/// The entry's own stat (not following symlinks) is resolved on first use
/// and cached for the lifetime of the listing.
#[derive(Debug, Clone)]
pub struct DirEntry {
    pub name: String,
    pub path: PathBuf,
    stat: OnceCell<Result<Stat, PathError>>,
}

impl DirEntry {
    pub fn new(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        Self {
            name,
            path,
            stat: OnceCell::new(),
        }
    }

    /// Entry with an already known stat.
    pub fn with_stat(path: PathBuf, stat: Stat) -> Self {
        let entry = Self::new(path);
        let _ = entry.stat.set(Ok(stat));
        entry
    }

    pub fn stat(&self, fs: &dyn Filesystem) -> Result<&Stat, &PathError> {
        self.stat
            .get_or_init(|| fs.stat(&self.path, false))
            .as_ref()
    }

    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }
}

/// Raw filesystem access used by the views.
pub trait Filesystem {
    /// List a directory, unordered.
    fn list(&self, path: &Path) -> Result<Vec<DirEntry>, PathError>;
    fn stat(&self, path: &Path, follow_symlinks: bool) -> Result<Stat, PathError>;
    fn read_link(&self, path: &Path) -> Result<PathBuf, PathError>;
    /// Read at most `limit` bytes from the start of a file.
    fn read_bytes(&self, path: &Path, limit: usize) -> Result<Vec<u8>, PathError>;
}

/// The local filesystem through `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFs;

impl Filesystem for LocalFs {
    fn list(&self, path: &Path) -> Result<Vec<DirEntry>, PathError> {
        let entries = fs::read_dir(path).map_err(|e| PathError::from_io(path, &e))?;
        let mut items = Vec::new();
        for entry in entries {
            // Entries that vanish or fail mid-listing are skipped.
            let Ok(entry) = entry else { continue };
            let item = match entry.metadata() {
                Ok(meta) => DirEntry::with_stat(entry.path(), Stat::from_metadata(&meta)),
                Err(_) => DirEntry::new(entry.path()),
            };
            items.push(item);
        }
        Ok(items)
    }

    fn stat(&self, path: &Path, follow_symlinks: bool) -> Result<Stat, PathError> {
        let result = if follow_symlinks {
            fs::metadata(path)
        } else {
            fs::symlink_metadata(path)
        };
        match result {
            Ok(meta) => Ok(Stat::from_metadata(&meta)),
            Err(e) => {
                let dangling = follow_symlinks
                    && e.kind() == std::io::ErrorKind::NotFound
                    && fs::symlink_metadata(path).is_ok();
                if dangling {
                    Err(PathError::BrokenSymlink {
                        path: path.to_path_buf(),
                    })
                } else {
                    Err(PathError::from_io(path, &e))
                }
            }
        }
    }

    fn read_link(&self, path: &Path) -> Result<PathBuf, PathError> {
        fs::read_link(path).map_err(|e| PathError::from_io(path, &e))
    }

    fn read_bytes(&self, path: &Path, limit: usize) -> Result<Vec<u8>, PathError> {
        let file = File::open(path).map_err(|e| PathError::from_io(path, &e))?;
        let mut data = Vec::new();
        file.take(limit as u64)
            .read_to_end(&mut data)
            .map_err(|e| PathError::from_io(path, &e))?;
        Ok(data)
    }
}

/// `ls -l` style permission string, e.g. `drwxr-xr-x`.
pub fn mode_string(kind: FileKind, mode: u32) -> String {
    let type_char = match kind {
        FileKind::Directory => 'd',
        FileKind::Symlink => 'l',
        FileKind::CharDevice => 'c',
        FileKind::BlockDevice => 'b',
        FileKind::Fifo => 'p',
        FileKind::Socket => 's',
        FileKind::Regular => '-',
        FileKind::Unknown => '?',
    };
    let mut s = String::with_capacity(10);
    s.push(type_char);
    for (shift, special, special_char) in [(6, 0o4000, 's'), (3, 0o2000, 's'), (0, 0o1000, 't')] {
        let bits = (mode >> shift) & 0o7;
        s.push(if bits & 0o4 != 0 { 'r' } else { '-' });
        s.push(if bits & 0o2 != 0 { 'w' } else { '-' });
        let exec = bits & 0o1 != 0;
        s.push(match (mode & special != 0, exec) {
            (true, true) => special_char,
            (true, false) => special_char.to_ascii_uppercase(),
            (false, true) => 'x',
            (false, false) => '-',
        });
    }
    s
}
