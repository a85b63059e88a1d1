use std::io::Cursor;

use binrw::BinRead;
use enumflags2::{bitflags, BitFlags};

use crate::ClusterId;

/// Every directory record is 32 bytes, short or long form alike.
pub const DIR_ENTRY_SIZE: usize = 32;

/// Byte offset of the attribute field inside a raw record.
const ATTR_OFFSET: usize = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[bitflags]
#[repr(u8)]
pub enum AttrFlag {
    ReadOnly = 0b0000_0001,
    Hidden = 0b0000_0010,
    /// The corresponding file is tagged as a component of the operating system
    System = 0b0000_0100,
    /// The corresponding entry contains the volume label
    VolumeID = 0b0000_1000,
    Directory = 0b0001_0000,
    /// Indicates that properties of the associated file have been modified
    Archive = 0b0010_0000,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum DirEntryStatus {
    /// name[0] == 0xE5, logically absent
    Free,
    /// name[0] == 0x00, every record after this one is also [`DirEntryStatus::TailFree`]
    TailFree,
    Occupied,
}

/// Classifies a raw record without decoding it.
pub fn entry_status(raw: &[u8]) -> DirEntryStatus {
    match raw[0] {
        0xE5 => DirEntryStatus::Free,
        0x00 => DirEntryStatus::TailFree,
        _ => DirEntryStatus::Occupied,
    }
}

/// A long-form record carries the long-name attribute combination in its
/// attribute byte; nothing else does.
pub fn is_long_entry(raw: &[u8]) -> bool {
    raw[ATTR_OFFSET] == LongDirEntry::ATTR
}

#[derive(Debug, Clone, BinRead)]
#[br(little)]
pub struct ShortDirEntry {
    /// 8-byte name, space-padded, upper-case.
    name: [u8; 8],

    /// 3-byte extension, space-padded, upper-case.
    ext: [u8; 3],

    #[br(map = BitFlags::<AttrFlag>::from_bits_truncate)]
    attr: BitFlags<AttrFlag>,

    /// Reserved, must be 0
    _ntres: u8,

    /// Count of tenths of a second.
    /// Range: [0, 199]
    _crt_time_tenth: u8,

    /// Creation time, granularity is 2 seconds
    _crt_time: u16,

    /// Creation date
    _crt_date: u16,

    /// Last access date
    _lst_acc_date: u16,

    /// High word of first data cluster number
    /// for file/directory described by this entry
    fst_clus_hi: u16,

    /// Last modification time
    _wrt_time: u16,

    /// Last modification date
    _wrt_date: u16,

    /// Low word of first data cluster number
    /// for file/directory described by this entry
    fst_clus_lo: u16,

    /// Quantity containing size in bytes
    /// of file/directory described by this entry
    file_size: u32,
}

impl ShortDirEntry {
    pub fn parse(raw: &[u8]) -> Result<Self, binrw::Error> {
        Self::read(&mut Cursor::new(raw))
    }

    pub fn attr(&self) -> BitFlags<AttrFlag> {
        self.attr
    }

    pub fn cluster_id(&self) -> ClusterId<u32> {
        let id: ClusterId<u32> = (self.fst_clus_lo, self.fst_clus_hi).into();

        if self.attr.contains(AttrFlag::Directory) {
            // A relative entry pointing at the root stores cluster 0,
            // but the root really lives at `ClusterId::MIN`.
            id.max(ClusterId::MIN)
        } else {
            id
        }
    }

    pub const fn size(&self) -> u32 {
        self.file_size
    }

    /// Case-insensitive 8.3 comparison of `token` against the name and
    /// extension fields. Returns the count of token characters consumed
    /// by the name field, up to the `.` separator.
    pub fn matches(&self, token: &str) -> Option<usize> {
        let token = token.as_bytes();
        let consumed = cmp_padded(&self.name, token)?;

        let rest = &token[consumed..];
        let rest = match rest.first() {
            Some(b'.') => &rest[1..],
            _ => rest,
        };
        cmp_padded(&self.ext, rest)?;

        Some(consumed)
    }
}

/// Compares `token` against a space-padded field, case-insensitively.
///
/// Succeeds only when the token reaches a separator (`.`) or its end at
/// the same position where the field runs into padding or its fixed
/// width. Returns the number of token characters consumed.
fn cmp_padded(field: &[u8], token: &[u8]) -> Option<usize> {
    let mut i = 0;
    while i < field.len() && field[i] != b' ' {
        match token.get(i) {
            None | Some(b'.') => break,
            Some(&c) => {
                if field[i] != c.to_ascii_uppercase() {
                    return None;
                }
            }
        }
        i += 1;
    }

    let at_boundary = matches!(token.get(i), None | Some(b'.'));
    let field_done = i == field.len() || field[i] == b' ';
    (at_boundary && field_done).then_some(i)
}

/// One fragment of a long (VFAT) name: 13 UTF-16 code units spread over
/// three ranges of the record. Fragments of one name are stored on disk
/// in descending sequence order, the short-form record they annotate
/// immediately after the sequence-1 fragment.
#[derive(Debug, Clone, BinRead)]
#[br(little)]
pub struct LongDirEntry {
    /// Sequence byte: low 5 bits are the position within the run
    /// (1-based); [`Self::LAST_MASK`] marks the lead record. The
    /// scanner reads it from the raw record before parsing.
    _ord: u8,

    name1: [u16; 5],

    _attr: u8,

    /// 0
    _type: u8,

    /// Checksum of the short name this record annotates.
    _chksum: u8,

    name2: [u16; 6],

    /// 0
    _fst_clus_lo: u16,

    name3: [u16; 2],
}

/// Three-way classification of a long-name code unit. The name is
/// stored as literal characters, then a single 0x0000 terminator, then
/// 0xFFFF padding up to the fragment boundary — the terminator and the
/// pad must not be compared as characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Char(u8),
    Terminator,
    Pad,
}

fn classify(unit: u16) -> Unit {
    match unit {
        0x0000 => Unit::Terminator,
        0xFFFF => Unit::Pad,
        // Only the low byte takes part in comparison; multi-byte code
        // points are out of scope.
        c => Unit::Char((c & 0xFF) as u8),
    }
}

impl LongDirEntry {
    /// Value of the attribute byte on every long-form record.
    pub const ATTR: u8 = 0x0F;

    /// Marks the lead (highest-sequence) record of a run.
    pub const LAST_MASK: u8 = 0b0100_0000;

    /// Low 5 bits of the sequence byte.
    pub const ORD_MASK: u8 = 0b0001_1111;

    /// Code units one fragment can hold.
    pub const UNITS: usize = 13;

    pub fn parse(raw: &[u8]) -> Result<Self, binrw::Error> {
        Self::read(&mut Cursor::new(raw))
    }

    fn units(&self) -> impl Iterator<Item = u16> + '_ {
        self.name1
            .iter()
            .chain(&self.name2)
            .chain(&self.name3)
            .copied()
    }

    /// Compares this fragment against the front of `token`.
    ///
    /// Returns the number of token bytes consumed, so that accumulating
    /// over a descending run yields the full matched length. At a
    /// terminator or pad unit the fragment only matches if the token is
    /// exhausted as well; a fragment of 13 literal characters matches
    /// partially and leaves the rest to the next record of the run.
    pub fn match_fragment(&self, token: &[u8]) -> Option<usize> {
        let mut matched = 0;
        for unit in self.units() {
            match classify(unit) {
                Unit::Terminator | Unit::Pad => {
                    return (matched == token.len()).then_some(matched);
                }
                Unit::Char(c) => match token.get(matched) {
                    Some(&t) if t == c => matched += 1,
                    _ => return None,
                },
            }
        }
        Some(matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short(name: &[u8; 8], ext: &[u8; 3]) -> ShortDirEntry {
        let mut raw = [0u8; 32];
        raw[..8].copy_from_slice(name);
        raw[8..11].copy_from_slice(ext);
        ShortDirEntry::parse(&raw).unwrap()
    }

    fn long(name: &str) -> LongDirEntry {
        let mut raw = [0u8; 32];
        raw[0] = 1;
        raw[ATTR_OFFSET] = LongDirEntry::ATTR;
        let mut units: Vec<u16> = name.bytes().map(u16::from).collect();
        if units.len() < LongDirEntry::UNITS {
            units.push(0x0000);
            units.resize(LongDirEntry::UNITS, 0xFFFF);
        }
        let layout: [(usize, std::ops::Range<usize>); 3] =
            [(0, 1..11), (5, 14..26), (11, 28..32)];
        for (i, range) in layout {
            for (u, chunk) in units[i..].iter().zip(raw[range].chunks_exact_mut(2)) {
                chunk.copy_from_slice(&u.to_le_bytes());
            }
        }
        LongDirEntry::parse(&raw).unwrap()
    }

    #[test]
    fn short_name_and_extension() {
        let entry = short(b"FILEA   ", b"TXT");
        assert_eq!(Some(5), entry.matches("filea.txt"));
        assert_eq!(Some(5), entry.matches("FILEA.TXT"));
        assert_eq!(None, entry.matches("filea"));
        assert_eq!(None, entry.matches("filea.txz"));
        assert_eq!(None, entry.matches("file.txt"));
        assert_eq!(None, entry.matches("fileab.txt"));
    }

    #[test]
    fn short_name_without_extension() {
        let entry = short(b"DIR     ", b"   ");
        assert_eq!(Some(3), entry.matches("dir"));
        assert_eq!(None, entry.matches("dir.txt"));
        assert_eq!(None, entry.matches("dirs"));
    }

    #[test]
    fn short_name_of_full_width() {
        let entry = short(b"LONGFI~1", b"TXT");
        assert_eq!(Some(8), entry.matches("longfi~1.txt"));
        assert_eq!(None, entry.matches("longfi~.txt"));
    }

    #[test]
    fn prefix_of_padded_name_does_not_match() {
        let entry = short(b"FILEA   ", b"TXT");
        assert_eq!(None, entry.matches("file.txt"));
    }

    #[test]
    fn fragment_terminator_requires_token_end() {
        let entry = long("abc");
        assert_eq!(Some(3), entry.match_fragment(b"abc"));
        assert_eq!(None, entry.match_fragment(b"abcd"));
        assert_eq!(None, entry.match_fragment(b"abd"));
        assert_eq!(None, entry.match_fragment(b"ab"));
    }

    #[test]
    fn full_fragment_matches_partially() {
        let entry = long("thirteenchars");
        assert_eq!(Some(13), entry.match_fragment(b"thirteenchars"));
        assert_eq!(Some(13), entry.match_fragment(b"thirteencharsmore"));
        assert_eq!(None, entry.match_fragment(b"thirteen"));
    }

    #[test]
    fn pad_only_fragment_matches_empty_remainder() {
        let entry = long("");
        assert_eq!(Some(0), entry.match_fragment(b""));
        assert_eq!(None, entry.match_fragment(b"x"));
    }
}
