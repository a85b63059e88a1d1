//! Volume layout
//!
//! reserved area | FAT area | data area

pub mod data;
pub mod fat;
pub mod reserved;
