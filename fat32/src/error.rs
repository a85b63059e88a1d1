use std::collections::TryReserveError;
use std::{fmt, io};

use crate::ClusterError;

#[derive(Debug)]
pub enum Error {
    /// Seek or read failure on the backing image.
    Io(io::Error),
    /// The image is too short for, or inconsistent with, an on-disk structure.
    Decode(binrw::Error),
    /// The FAT or scratch buffer could not be allocated.
    Alloc(TryReserveError),
    /// A path component has no matching directory entry.
    NotFound,
    /// A non-final path component matched a file.
    NotADirectory,
    /// The final path component matched a directory.
    IsADirectory,
    /// A cluster chain left the FAT, hit a free/bad/reserved entry,
    /// or out-ran the number of FAT entries without terminating.
    CorruptChain,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "image I/O failure: {e}"),
            Error::Decode(e) => write!(f, "on-disk structure decode failure: {e}"),
            Error::Alloc(e) => write!(f, "buffer allocation failure: {e}"),
            Error::NotFound => write!(f, "no such file or directory"),
            Error::NotADirectory => write!(f, "path component is not a directory"),
            Error::IsADirectory => write!(f, "path names a directory, not a file"),
            Error::CorruptChain => write!(f, "corrupt or unterminated cluster chain"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Decode(e) => Some(e),
            Error::Alloc(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<binrw::Error> for Error {
    fn from(e: binrw::Error) -> Self {
        Error::Decode(e)
    }
}

impl From<TryReserveError> for Error {
    fn from(e: TryReserveError) -> Self {
        Error::Alloc(e)
    }
}

/// Any invalid cluster value met while walking a chain means the chain
/// itself cannot be trusted.
impl From<ClusterError> for Error {
    fn from(_: ClusterError) -> Self {
        Error::CorruptChain
    }
}
