//! Data area: the region holding directory records and file contents,
//! indexed by cluster number.
//!
//! FAT entries 0 and 1 are the media descriptor and a reserved slot, so
//! the first addressable cluster of the data area is number 2.

mod dir_entry;

use std::io::{Read, Seek, SeekFrom};

pub use self::dir_entry::*;
use crate::volume::reserved::Bpb;
use crate::{ClusterError, ClusterId, Error};

#[derive(Debug)]
pub struct DataArea {
    offset: u64,
    cluster_bytes: usize,
}

impl DataArea {
    pub fn new(bpb: &Bpb) -> Self {
        Self {
            offset: bpb.data_offset(),
            cluster_bytes: bpb.cluster_bytes(),
        }
    }

    pub const fn cluster_bytes(&self) -> usize {
        self.cluster_bytes
    }

    /// Byte offset of a cluster's data.
    ///
    /// The data area does not hold the two clusters below
    /// [`ClusterId::MIN`], hence the validation and rebasing.
    pub fn cluster_offset(&self, id: ClusterId<u32>) -> Result<u64, ClusterError> {
        let id = id.validate()?;
        let index = (usize::from(id) - usize::from(ClusterId::MIN)) as u64;
        Ok(self.offset + index * self.cluster_bytes as u64)
    }

    /// Reads one whole cluster into `buf`, which must be
    /// [`Self::cluster_bytes`] long.
    pub fn read_cluster<R: Read + Seek>(
        &self,
        image: &mut R,
        id: ClusterId<u32>,
        buf: &mut [u8],
    ) -> Result<(), Error> {
        let offset = self.cluster_offset(id)?;
        image.seek(SeekFrom::Start(offset))?;
        image.read_exact(buf)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AREA: DataArea = DataArea {
        offset: 2048,
        cluster_bytes: 512,
    };

    #[test]
    fn offsets_are_rebased_past_the_reserved_pair() {
        assert_eq!(Ok(2048), AREA.cluster_offset(ClusterId::MIN));
        assert_eq!(Ok(3072), AREA.cluster_offset(ClusterId::new(4)));
    }

    #[test]
    fn reserved_clusters_have_no_offset() {
        assert_eq!(Err(ClusterError::Free), AREA.cluster_offset(ClusterId::FREE));
        assert!(AREA.cluster_offset(ClusterId::new(1)).is_err());
        assert_eq!(Err(ClusterError::Defective), AREA.cluster_offset(ClusterId::BAD));
    }
}
