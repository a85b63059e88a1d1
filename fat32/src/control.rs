use std::io::{Read, Seek, SeekFrom};

use binrw::BinRead;

use crate::resolve::{self, ResolvedEntry};
use crate::volume::data::DataArea;
use crate::volume::fat::{ClusterChain, Fat};
use crate::volume::reserved::Bpb;
use crate::{ClusterId, Error};

/// A read-only FAT32 volume backed by any seekable byte source.
///
/// Opening parses the boot metadata and loads the whole FAT; both stay
/// immutable for the handle's lifetime. Each handle owns its buffers,
/// so concurrent resolutions need one handle per image each.
#[derive(Debug)]
pub struct FatFileSystem<R> {
    image: R,
    bpb: Bpb,
    fat: Fat,
    data: DataArea,
}

impl<R: Read + Seek> FatFileSystem<R> {
    pub fn open(mut image: R) -> Result<Self, Error> {
        image.seek(SeekFrom::Start(0))?;
        let bpb = Bpb::read(&mut image)?;
        log::debug!(
            "sector={}B cluster={}B fats={}x{}B data@{:#x} total={}s root={}",
            bpb.sector_bytes(),
            bpb.cluster_bytes(),
            bpb.fat_count(),
            bpb.fat_bytes(),
            bpb.data_offset(),
            bpb.total_sectors(),
            bpb.root_cluster(),
        );

        let fat = Fat::load(&mut image, &bpb)?;
        let data = DataArea::new(&bpb);

        Ok(Self {
            image,
            bpb,
            fat,
            data,
        })
    }

    pub fn bpb(&self) -> &Bpb {
        &self.bpb
    }

    /// Resolves a `/`-separated path to the starting cluster, byte size
    /// and kind of the entry it names. Empty components are ignored, so
    /// a leading separator is allowed but not required.
    pub fn resolve(&mut self, path: &str) -> Result<ResolvedEntry, Error> {
        resolve::resolve(&mut self.image, &self.bpb, &self.fat, &self.data, path)
    }

    /// The ordered clusters occupied by the file starting at `start`.
    pub fn chain(&self, start: ClusterId<u32>) -> ClusterChain<'_> {
        self.fat.chain(start)
    }
}
