use std::io::{Read, Seek};

use enumflags2::BitFlags;

use crate::volume::data::{
    self, AttrFlag, DataArea, DirEntryStatus, LongDirEntry, ShortDirEntry, DIR_ENTRY_SIZE,
};
use crate::volume::fat::Fat;
use crate::volume::reserved::Bpb;
use crate::{ClusterId, Error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

impl From<BitFlags<AttrFlag>> for EntryKind {
    fn from(attr: BitFlags<AttrFlag>) -> Self {
        if attr.contains(AttrFlag::Directory) {
            Self::Directory
        } else {
            Self::File
        }
    }
}

/// The outcome of matching one path component: where the entry's data
/// starts, how long it is, and whether it is a file or a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedEntry {
    pub cluster: ClusterId<u32>,
    pub size: u32,
    pub kind: EntryKind,
}

impl From<&ShortDirEntry> for ResolvedEntry {
    fn from(dirent: &ShortDirEntry) -> Self {
        Self {
            cluster: dirent.cluster_id(),
            size: dirent.size(),
            kind: dirent.attr().into(),
        }
    }
}

/// Walks `path` component by component from the root directory.
///
/// A path with no components (empty or all separators) resolves to the
/// root directory itself. Otherwise the final component must name a
/// file and every earlier one a directory.
pub(crate) fn resolve<R: Read + Seek>(
    image: &mut R,
    bpb: &Bpb,
    fat: &Fat,
    data: &DataArea,
    path: &str,
) -> Result<ResolvedEntry, Error> {
    let mut current = ResolvedEntry {
        cluster: bpb.root_cluster(),
        size: 0,
        kind: EntryKind::Directory,
    };

    let mut scratch = Vec::new();

    let mut components = path.split('/').filter(|c| !c.is_empty()).peekable();
    while let Some(token) = components.next() {
        log::trace!("resolving component {token:?} in cluster {}", current.cluster);
        current = find_in_dir(image, fat, data, &mut scratch, current.cluster, token)?;

        match (components.peek().is_some(), current.kind) {
            (true, EntryKind::File) => return Err(Error::NotADirectory),
            (false, EntryKind::Directory) => return Err(Error::IsADirectory),
            _ => {}
        }
    }

    Ok(current)
}

/// Scans the directory starting at `dir` for an entry named `token`.
///
/// The directory's whole cluster chain is assembled into one record
/// stream before scanning: a long-name run is allowed to straddle a
/// cluster boundary, so no cluster can be judged in isolation.
fn find_in_dir<R: Read + Seek>(
    image: &mut R,
    fat: &Fat,
    data: &DataArea,
    scratch: &mut Vec<u8>,
    dir: ClusterId<u32>,
    token: &str,
) -> Result<ResolvedEntry, Error> {
    scratch.clear();
    for cluster in fat.chain(dir) {
        let off = scratch.len();
        scratch.try_reserve_exact(data.cluster_bytes())?;
        scratch.resize(off + data.cluster_bytes(), 0);
        data.read_cluster(image, cluster?, &mut scratch[off..])?;
    }

    scan_records(scratch, token)?.ok_or(Error::NotFound)
}

/// Walks the 32-byte records of one directory stream. `Ok(None)` when
/// the 0x00 terminator record or the end of the stream is reached
/// without a match.
fn scan_records(buf: &[u8], token: &str) -> Result<Option<ResolvedEntry>, Error> {
    let mut off = 0;
    while off + DIR_ENTRY_SIZE <= buf.len() {
        let record = &buf[off..off + DIR_ENTRY_SIZE];

        match data::entry_status(record) {
            DirEntryStatus::TailFree => return Ok(None),
            DirEntryStatus::Free => {
                off += DIR_ENTRY_SIZE;
                continue;
            }
            DirEntryStatus::Occupied => {}
        }

        if data::is_long_entry(record) {
            // A run starts at its lead record; a continuation fragment
            // found on its own has no name to anchor to.
            if record[0] & LongDirEntry::LAST_MASK == 0 {
                log::warn!("stray long-name fragment at offset {off}");
                off += DIR_ENTRY_SIZE;
                continue;
            }

            // The short record sits right after the sequence-1 fragment.
            let count = (record[0] & LongDirEntry::ORD_MASK) as usize;
            let run_end = off + (count + 1) * DIR_ENTRY_SIZE;
            if count == 0 || run_end > buf.len() {
                log::warn!("malformed long-name run at offset {off}");
                return Ok(None);
            }

            if let Some(entry) = match_long_run(&buf[off..run_end], count, token)? {
                return Ok(Some(entry));
            }
            // Skip the fragments only: the short record after the run
            // is still a candidate under its 8.3 alias.
            off += count * DIR_ENTRY_SIZE;
        } else {
            let dirent = ShortDirEntry::parse(record)?;
            if dirent.matches(token).is_some() {
                return Ok(Some((&dirent).into()));
            }
            off += DIR_ENTRY_SIZE;
        }
    }

    Ok(None)
}

/// Matches `token` against a full long-name run followed by its short
/// record. `run` holds `count` long records plus the short one;
/// fragments are compared in descending sequence order, i.e. walking
/// backward from the record just before the short entry.
fn match_long_run(run: &[u8], count: usize, token: &str) -> Result<Option<ResolvedEntry>, Error> {
    let token = token.as_bytes();

    let mut pos = 0;
    for i in (0..count).rev() {
        let fragment = LongDirEntry::parse(&run[i * DIR_ENTRY_SIZE..(i + 1) * DIR_ENTRY_SIZE])?;
        match fragment.match_fragment(&token[pos..]) {
            Some(n) => pos += n,
            None => return Ok(None),
        }
    }

    if pos < token.len() {
        return Ok(None);
    }

    let dirent = ShortDirEntry::parse(&run[count * DIR_ENTRY_SIZE..])?;
    Ok(Some((&dirent).into()))
}
