use std::fmt;

/// An LSB ordered bitmap.
#[derive(Clone, Default)]
pub struct Bitmap {
    len: usize,
    data: Vec<u8>,
}

impl Bitmap {
    pub fn with_capacity(cap: usize) -> Self {
        Bitmap {
            len: 0,
            data: Vec::with_capacity(cap.div_ceil(8)),
        }
    }

    pub fn new_with_all_true(len: usize) -> Self {
        Bitmap {
            len,
            data: vec![u8::MAX; len.div_ceil(8)],
        }
    }

    /// Get the number of bits being tracked by this bitmap.
    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn count_trues(&self) -> usize {
        (0..self.len).filter(|&idx| self.value(idx)).count()
    }

    /// Push a value onto the end of the bitmap.
    pub fn push(&mut self, val: bool) {
        if self.len == self.data.len() * 8 {
            self.data.push(0);
        }
        let idx = self.len;
        self.len += 1;
        self.set_unchecked(idx, val);
    }

    /// Get the value at index.
    ///
    /// Panics if index is out of bounds.
    #[inline]
    pub fn value(&self, idx: usize) -> bool {
        assert!(idx < self.len, "bitmap index {idx} out of bounds for len {}", self.len);
        let byte = self.data[idx >> 3];
        (byte >> (idx & 7)) & 1 != 0
    }

    /// Set a bit at index.
    ///
    /// Panics if index is out of bounds.
    #[inline]
    fn set_unchecked(&mut self, idx: usize, val: bool) {
        let byte = idx / 8;
        let bit = idx & 7;
        if val {
            self.data[byte] |= 1 << bit;
        } else {
            self.data[byte] &= !(1 << bit);
        }
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = bool> + '_ {
        (0..self.len).map(|idx| self.value(idx))
    }
}

impl FromIterator<bool> for Bitmap {
    fn from_iter<T: IntoIterator<Item = bool>>(iter: T) -> Self {
        let iter = iter.into_iter();
        let mut bitmap = Bitmap::with_capacity(iter.size_hint().0);
        for v in iter {
            bitmap.push(v);
        }
        bitmap
    }
}

// Bits past `len` in the last byte are unspecified.
impl PartialEq for Bitmap {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl Eq for Bitmap {}

impl fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_read() {
        let bm = Bitmap::from_iter([true, false, true, true, false, true, true, true, false]);
        assert_eq!(9, bm.len());
        assert_eq!(6, bm.count_trues());
        assert!(!bm.value(8));
        assert!(bm.value(7));
    }

    #[test]
    fn all_true_trailing_bits_ignored() {
        let bm = Bitmap::new_with_all_true(3);
        assert_eq!(3, bm.count_trues());
        assert_eq!(vec![true, true, true], bm.iter().collect::<Vec<_>>());
    }

    #[test]
    #[should_panic]
    fn value_past_len_in_last_byte_panics() {
        // Trailing bits of the last byte are set, but not readable.
        let bm = Bitmap::new_with_all_true(3);
        bm.value(3);
    }

    #[test]
    fn eq_ignores_trailing_bits() {
        let mut a = Bitmap::new_with_all_true(2);
        a.push(false);
        let b = Bitmap::from_iter([true, true, false]);
        assert_eq!(a, b);
    }
}
