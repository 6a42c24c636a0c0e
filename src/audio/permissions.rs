//! Reports the permission bits of a file. Diagnostic only, nothing in
//! the chat path depends on it.
use std::fmt;
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PermissionBits {
    pub read: bool,
    pub write: bool,
    pub execute: bool,
}

impl PermissionBits {
    fn from_triplet(bits: u32) -> Self {
        Self {
            read: bits & 0o4 != 0,
            write: bits & 0o2 != 0,
            execute: bits & 0o1 != 0,
        }
    }
}

impl fmt::Display for PermissionBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            if self.read { 'r' } else { '-' },
            if self.write { 'w' } else { '-' },
            if self.execute { 'x' } else { '-' }
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FilePermissions {
    pub mode: u32,
    pub owner: PermissionBits,
    pub group: PermissionBits,
    pub other: PermissionBits,
}

impl FilePermissions {
    pub fn from_mode(mode: u32) -> Self {
        Self {
            mode: mode & 0o777,
            owner: PermissionBits::from_triplet(mode >> 6),
            group: PermissionBits::from_triplet(mode >> 3),
            other: PermissionBits::from_triplet(mode),
        }
    }
}

impl fmt::Display for FilePermissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{} ({:03o})", self.owner, self.group, self.other, self.mode)
    }
}

#[cfg(unix)]
pub fn inspect(path: &Path) -> std::io::Result<FilePermissions> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = std::fs::metadata(path)?;
    Ok(FilePermissions::from_mode(metadata.permissions().mode()))
}

// Only the read-only flag is available off unix so approximate a mode
// from it
#[cfg(not(unix))]
pub fn inspect(path: &Path) -> std::io::Result<FilePermissions> {
    let metadata = std::fs::metadata(path)?;
    let mode = if metadata.permissions().readonly() {
        0o444
    } else {
        0o666
    };
    Ok(FilePermissions::from_mode(mode))
}
