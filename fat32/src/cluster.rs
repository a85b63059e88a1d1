use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ClusterId<T = u32>(T);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterError {
    Free,
    Defective,
    Reserved,
    Eof,
}

impl From<u32> for ClusterId<u32> {
    fn from(raw: u32) -> Self {
        Self(raw & 0x0FFF_FFFF)
    }
}

/// Combines the (low, high) halves stored in a short directory entry.
impl From<(u16, u16)> for ClusterId<u32> {
    fn from((low, high): (u16, u16)) -> Self {
        Self::new((high as u32) << 16 | low as u32)
    }
}

impl From<ClusterId<u32>> for u32 {
    fn from(id: ClusterId<u32>) -> Self {
        id.0
    }
}

impl From<ClusterId<u32>> for usize {
    fn from(id: ClusterId<u32>) -> Self {
        id.0 as usize
    }
}

impl fmt::Display for ClusterId<u32> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl ClusterId<u32> {
    pub const FREE: Self = Self(0);

    /// Smallest cluster number the data area can address.
    pub const MIN: Self = Self(2);

    /// End-of-chain sentinel. Only this exact value terminates a chain;
    /// 0x0FFF_FFF8..=0x0FFF_FFFE are reserved.
    pub const EOF: Self = Self(0x0FFF_FFFF);

    pub const BAD: Self = Self(0x0FFF_FFF7);

    pub const fn new(raw: u32) -> Self {
        Self(raw & 0x0FFF_FFFF)
    }

    pub fn is_unavailable(&self) -> bool {
        *self < Self::MIN || (Self(0x0FFF_FFF8)..=Self(0x0FFF_FFFE)).contains(self)
    }

    pub fn validate(self) -> Result<Self, ClusterError> {
        match self {
            ClusterId::FREE => Err(ClusterError::Free),
            ClusterId::BAD => Err(ClusterError::Defective),
            ClusterId::EOF => Err(ClusterError::Eof),
            id if id.is_unavailable() => Err(ClusterError::Reserved),
            id => Ok(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_values_are_masked_to_28_bits() {
        assert_eq!(ClusterId::EOF, ClusterId::from(0xFFFF_FFFF));
        assert_eq!(ClusterId::new(7), ClusterId::from(0xF000_0007));
    }

    #[test]
    fn halves_combine_little_endian() {
        assert_eq!(ClusterId::new(0x0012_0034), ClusterId::from((0x0034, 0x0012)));
    }

    #[test]
    fn validate_classifies_sentinels() {
        assert_eq!(Err(ClusterError::Free), ClusterId::FREE.validate());
        assert_eq!(Err(ClusterError::Eof), ClusterId::EOF.validate());
        assert_eq!(Err(ClusterError::Defective), ClusterId::BAD.validate());
        assert_eq!(Err(ClusterError::Reserved), ClusterId::new(1).validate());
        assert_eq!(Err(ClusterError::Reserved), ClusterId::new(0x0FFF_FFF8).validate());
        assert_eq!(Ok(ClusterId::MIN), ClusterId::MIN.validate());
    }
}
