use std::path::PathBuf;

use clap::Parser;

/// Resolve a path on a FAT32 disk image to its cluster chain.
#[derive(Parser)]
pub struct Cli {
    /// FAT32 disk image
    pub image: PathBuf,

    /// Slash-separated path of the file to resolve
    pub path: String,
}
