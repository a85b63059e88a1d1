use std::io::{Read, Seek, SeekFrom};

use crate::volume::reserved::Bpb;
use crate::{ClusterError, ClusterId, Error};

/// The File Allocation Table, loaded into memory in one read and
/// immutable afterwards. Entry `i` is the successor of cluster `i`.
#[derive(Debug)]
pub struct Fat {
    entries: Vec<u32>,
}

impl Fat {
    /// Reads the first FAT copy, `fat_bytes` octets starting at the end
    /// of the reserved area.
    pub fn load<R: Read + Seek>(image: &mut R, bpb: &Bpb) -> Result<Self, Error> {
        let len = bpb.fat_bytes();

        let mut raw = Vec::new();
        raw.try_reserve_exact(len)?;
        raw.resize(len, 0);

        image.seek(SeekFrom::Start(bpb.fat_offset()))?;
        image.read_exact(&mut raw)?;

        let mut entries = Vec::new();
        entries.try_reserve_exact(len / 4)?;
        entries.extend(
            raw.chunks_exact(4)
                .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]])),
        );

        Ok(Self { entries })
    }

    /// Looks up the successor of `id`.
    /// Errs if `id` itself is not a walkable cluster or lies outside the table.
    /// `Ok(None)` means `id` is the last cluster of its chain.
    pub fn next(&self, id: ClusterId<u32>) -> Result<Option<ClusterId<u32>>, ClusterError> {
        let id = id.validate()?;
        let raw = *self
            .entries
            .get(usize::from(id))
            .ok_or(ClusterError::Reserved)?;

        match ClusterId::from(raw).validate() {
            Ok(next) => Ok(Some(next)),
            Err(ClusterError::Eof) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Lazy walk of the chain starting at `start`, the starting cluster
    /// included. Bounded by the table size: a chain that revisits
    /// clusters runs out of budget and yields [`Error::CorruptChain`]
    /// instead of looping.
    pub fn chain(&self, start: ClusterId<u32>) -> ClusterChain<'_> {
        ClusterChain {
            fat: self,
            next: Some(start),
            budget: self.entries.len(),
        }
    }
}

#[derive(Debug)]
pub struct ClusterChain<'a> {
    fat: &'a Fat,
    next: Option<ClusterId<u32>>,
    budget: usize,
}

impl Iterator for ClusterChain<'_> {
    type Item = Result<ClusterId<u32>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next.take()?;

        if self.budget == 0 {
            return Some(Err(Error::CorruptChain));
        }
        self.budget -= 1;

        match self.fat.next(id) {
            Ok(succ) => {
                self.next = succ;
                Some(Ok(id))
            }
            Err(e) => Some(Err(e.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fat_of(entries: &[u32]) -> Fat {
        Fat {
            entries: entries.to_vec(),
        }
    }

    // entries 0 and 1 are the media descriptor and a reserved slot
    const HEAD: [u32; 2] = [0x0FFF_FFF8, 0x0FFF_FFFF];

    #[test]
    fn chain_stops_at_eof() {
        let fat = fat_of(&[HEAD[0], HEAD[1], 3, 4, 0x0FFF_FFFF, 0x0FFF_FFFF]);
        let chain: Vec<_> = fat
            .chain(ClusterId::new(2))
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(
            vec![ClusterId::new(2), ClusterId::new(3), ClusterId::new(4)],
            chain
        );
    }

    #[test]
    fn self_link_is_corrupt() {
        let fat = fat_of(&[HEAD[0], HEAD[1], 2]);
        let got: Result<Vec<_>, _> = fat.chain(ClusterId::new(2)).collect();
        assert!(matches!(got, Err(Error::CorruptChain)));
    }

    #[test]
    fn free_start_is_corrupt() {
        let fat = fat_of(&[HEAD[0], HEAD[1], 0x0FFF_FFFF]);
        let got: Result<Vec<_>, _> = fat.chain(ClusterId::FREE).collect();
        assert!(matches!(got, Err(Error::CorruptChain)));
    }

    #[test]
    fn link_outside_table_is_corrupt() {
        let fat = fat_of(&[HEAD[0], HEAD[1], 100]);
        let got: Result<Vec<_>, _> = fat.chain(ClusterId::new(2)).collect();
        assert!(matches!(got, Err(Error::CorruptChain)));
    }
}
