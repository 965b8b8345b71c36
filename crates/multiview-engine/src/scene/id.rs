use core::fmt;

/// Registry handle for a drawable.
///
/// Ids are handed out by a render coordinator in registration order and are
/// never reused by that coordinator, so a stale id can only fail its lookups.
/// Ids carry no owner: every coordinator counts from 1, and an id is only
/// meaningful to the coordinator that issued it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct DrawableId(u64);

impl DrawableId {
    #[inline]
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for DrawableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
