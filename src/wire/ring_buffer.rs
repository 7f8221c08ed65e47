//! Fixed-capacity byte ring buffer for line framing
//!
//! Bytes accumulate across serial reads without allocation, and consuming a
//! line is O(1).

/// Fixed-capacity ring buffer with O(1) advance
///
/// Generic const parameter `N` sets buffer capacity.
pub struct RingBuffer<const N: usize> {
    data: [u8; N],
    head: usize, // Write position (next empty slot)
    tail: usize, // Read position (first valid byte)
    len: usize,
}

impl<const N: usize> RingBuffer<N> {
    pub const fn new() -> Self {
        Self {
            data: [0u8; N],
            head: 0,
            tail: 0,
            len: 0,
        }
    }

    /// Append bytes, returns how many were stored
    ///
    /// Bytes beyond the remaining capacity are dropped.
    #[inline]
    pub fn extend(&mut self, bytes: &[u8]) -> usize {
        let accepted = bytes.len().min(N - self.len);
        for &b in &bytes[..accepted] {
            self.data[self.head] = b;
            self.head = (self.head + 1) % N;
        }
        self.len += accepted;
        accepted
    }

    /// Consume n bytes from the front
    #[inline]
    pub fn advance(&mut self, n: usize) {
        let n = n.min(self.len);
        self.tail = (self.tail + n) % N;
        self.len -= n;
    }

    /// Drop everything buffered
    pub fn clear(&mut self) {
        self.head = 0;
        self.tail = 0;
        self.len = 0;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Read byte at logical index (handles wraparound)
    #[inline]
    pub fn get(&self, index: usize) -> Option<u8> {
        if index < self.len {
            Some(self.data[(self.tail + index) % N])
        } else {
            None
        }
    }

    /// Offset of the first occurrence of `byte`, from the tail
    pub fn find(&self, byte: u8) -> Option<usize> {
        (0..self.len).find(|&i| self.data[(self.tail + i) % N] == byte)
    }

    /// Copy the first `out.len()` bytes into `out` without consuming them
    ///
    /// Returns `false` if fewer bytes are buffered.
    pub fn copy_front(&self, out: &mut [u8]) -> bool {
        if out.len() > self.len {
            return false;
        }
        let first = out.len().min(N - self.tail);
        let rest = out.len() - first;
        out[..first].copy_from_slice(&self.data[self.tail..self.tail + first]);
        out[first..].copy_from_slice(&self.data[..rest]);
        true
    }
}

impl<const N: usize> Default for RingBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_operations() {
        let mut rb: RingBuffer<16> = RingBuffer::new();
        assert!(rb.is_empty());

        assert_eq!(rb.extend(&[1, 2, 3, 4, 5]), 5);
        assert_eq!(rb.len(), 5);
        assert_eq!(rb.get(0), Some(1));
        assert_eq!(rb.get(4), Some(5));
        assert_eq!(rb.get(5), None);
    }

    #[test]
    fn test_overflow_is_dropped() {
        let mut rb: RingBuffer<4> = RingBuffer::new();
        assert_eq!(rb.extend(&[1, 2, 3, 4, 5, 6]), 4);
        assert_eq!(rb.len(), 4);
        assert_eq!(rb.get(3), Some(4));
    }

    #[test]
    fn test_wraparound_find_and_copy() {
        let mut rb: RingBuffer<8> = RingBuffer::new();

        rb.extend(b"abcdef");
        rb.advance(5); // tail=5, len=1
        rb.extend(b"gh\nij"); // head wraps

        assert_eq!(rb.len(), 6);
        assert_eq!(rb.find(b'\n'), Some(3));

        let mut out = [0u8; 4];
        assert!(rb.copy_front(&mut out));
        assert_eq!(&out, b"fgh\n");

        let mut too_long = [0u8; 7];
        assert!(!rb.copy_front(&mut too_long));
    }

    #[test]
    fn test_copy_front_split_across_end() {
        let mut rb: RingBuffer<4> = RingBuffer::new();
        rb.extend(b"abc");
        rb.advance(3); // tail=3
        rb.extend(b"wxyz");

        let mut out = [0u8; 4];
        assert!(rb.copy_front(&mut out));
        assert_eq!(&out, b"wxyz");
        assert_eq!(rb.len(), 4);
    }

    #[test]
    fn test_clear() {
        let mut rb: RingBuffer<8> = RingBuffer::new();
        rb.extend(b"abc");
        rb.clear();
        assert!(rb.is_empty());
        assert_eq!(rb.find(b'a'), None);
    }
}
