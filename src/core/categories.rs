use std::collections::HashMap;

/// Filter bit of the unlabeled/default category.
pub const DEFAULT_CATEGORY: u16 = 1;

/// Mask that accepts every category.
pub const ACCEPT_ALL: u16 = 0xFFFF;

/// Lazily assigns a unique power-of-two filter bit to each named collision
/// category and derives accept-masks from lists of names.
///
/// Owned by the context rather than being process-wide ambient state, so a
/// fresh simulation run always allocates bits in a deterministic order.
#[derive(Debug, Default)]
pub struct CategoryRegistry {
    bits: HashMap<String, u16>,
    /// Exponent of the next bit to hand out. Bit 0 is the default category.
    next_exponent: u32,
}

impl CategoryRegistry {
    pub fn new() -> Self {
        Self {
            bits: HashMap::new(),
            next_exponent: 1,
        }
    }

    /// The filter bit for a named category.
    ///
    /// `None` or an empty name maps to the default category (bit 1). The
    /// first use of a distinct name allocates the next unused power of two
    /// (2, 4, 8, …) and caches it; later calls are idempotent. The mask is
    /// 16 bits wide, so at most 15 named categories fit — requests beyond
    /// that are reported and fall back to the default bit instead of
    /// silently wrapping.
    pub fn bit_for(&mut self, name: Option<&str>) -> u16 {
        let name = match name {
            Some(n) if !n.is_empty() => n,
            _ => return DEFAULT_CATEGORY,
        };
        if let Some(&bit) = self.bits.get(name) {
            return bit;
        }
        if self.next_exponent >= u16::BITS {
            log::warn!(
                "collision category {name:?} exceeds the 16-bit filter width; using the default category"
            );
            return DEFAULT_CATEGORY;
        }
        let bit = 1u16 << self.next_exponent;
        self.next_exponent += 1;
        self.bits.insert(name.to_owned(), bit);
        bit
    }

    /// The accept-mask for a list of category names.
    ///
    /// Absent or empty lists accept everything. Duplicates are harmless and
    /// order is irrelevant.
    pub fn mask_for<S: AsRef<str>>(&mut self, names: Option<&[S]>) -> u16 {
        match names {
            None => ACCEPT_ALL,
            Some([]) => ACCEPT_ALL,
            Some(names) => names
                .iter()
                .fold(0, |mask, n| mask | self.bit_for(Some(n.as_ref()))),
        }
    }

    /// Number of distinct named categories allocated so far.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }
}
