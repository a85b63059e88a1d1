use binrw::BinRead;

use crate::ClusterId;

/// BIOS Parameter Block, located in the first sector of the reserved area
/// (the boot sector), followed in place by the extended BPB fields that
/// only a FAT32 volume carries.
///
/// Decoded field by field in little-endian order starting at byte 11;
/// the layout is never overlaid onto raw memory. No signature or
/// filesystem-type validation is performed: feeding a non-FAT32 image
/// produces undefined resolution results, not a crash.
#[derive(Debug, Clone, BinRead)]
#[br(little)]
pub struct Bpb {
    /// Bytes per sector.
    #[br(pad_before = 11)] // jump instruction + OEM name
    byts_per_sec: u16,

    /// Sectors per cluster.
    sec_per_clus: u8,

    /// Sectors in the reserved area.
    rsvd_sec_cnt: u16,

    /// Number of FAT copies, usually 2.
    num_fats: u8,

    /// - FAT32: 0
    _root_ent_cnt: u16,

    /// - FAT32: 0
    _tot_sec16: u16,

    /// Physical media type.
    _media: u8,

    /// - FAT32: 0
    _fat_sz16: u16,

    /// Sectors per track, interrupt 0x13 geometry.
    _sec_per_trk: u16,

    /// Head count, interrupt 0x13 geometry.
    _num_heads: u16,

    _hidd_sec: u32,

    /// - FAT32: total sector count of the volume.
    tot_sec32: u32,

    /*
     * Extended BPB fields for FAT32 volume
     */
    /// Sectors occupied by one FAT copy.
    fat_sz32: u32,

    /// FAT mirroring flags, unused by resolution.
    _ext_flags: u16,

    /// Volume version, 0x0.
    _fs_ver: u16,

    /// First cluster of the root directory, normally 2.
    root_clus: u32,

    /// Sector of the FSINFO structure within the reserved area.
    _fs_info: u16,

    /// Sector of the boot sector backup, if non-zero.
    _bk_boot_sec: u16,

    _reserved: [u8; 12],

    /// Interrupt 0x13 drive number, 0x80 or 0x00.
    _drv_num: u8,

    _reserved1: u8,

    _boot_sig: u8,

    _voll_d: u32,

    /// Volume label; "NO NAME    " when unset.
    voll_lab: [u8; 11],

    /// Filesystem type string, informational only.
    _fil_sys_type: [u8; 8],
}

impl Bpb {
    pub const fn sector_bytes(&self) -> usize {
        self.byts_per_sec as usize
    }

    pub const fn cluster_sectors(&self) -> usize {
        self.sec_per_clus as usize
    }

    pub const fn cluster_bytes(&self) -> usize {
        self.cluster_sectors() * self.sector_bytes()
    }

    pub const fn fat_count(&self) -> usize {
        self.num_fats as usize
    }

    /// Byte offset of the first FAT copy, right after the reserved area.
    pub const fn fat_offset(&self) -> u64 {
        self.rsvd_sec_cnt as u64 * self.byts_per_sec as u64
    }

    /// Bytes occupied by one FAT copy.
    pub const fn fat_bytes(&self) -> usize {
        self.fat_sz32 as usize * self.sector_bytes()
    }

    /// Byte offset of the data area: past the reserved area and every
    /// FAT copy. Equal to the end of the last FAT copy by construction.
    pub const fn data_offset(&self) -> u64 {
        self.fat_offset() + (self.fat_bytes() * self.fat_count()) as u64
    }

    pub const fn total_sectors(&self) -> usize {
        self.tot_sec32 as usize
    }

    pub fn root_cluster(&self) -> ClusterId<u32> {
        ClusterId::new(self.root_clus)
    }

    pub const fn volume_label(&self) -> &[u8; 11] {
        &self.voll_lab
    }
}
