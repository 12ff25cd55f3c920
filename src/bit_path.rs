use std::fmt;

/// Branch choices from the root to a leaf, one ASCII `'0'` (left) or `'1'`
/// (right) byte per step. This is also the exact on-disk form of a code, both
/// in the codebook and in compressed files.
#[derive(Default, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BitPath {
    bits: Vec<u8>,
}

impl BitPath {
    pub fn new() -> Self {
        BitPath { bits: Vec::new() }
    }

    /// Validates a path read from a codebook. `None` if it is empty or holds
    /// anything but `'0'` and `'1'`.
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        if bytes.is_empty() || !bytes.iter().all(|&b| b == b'0' || b == b'1') {
            return None;
        }
        Some(BitPath { bits: bytes.to_vec() })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn push_bit(&mut self, bit: bool) {
        self.bits.push(if bit { b'1' } else { b'0' });
    }

    /// This path extended by one step.
    pub fn child(&self, bit: bool) -> Self {
        let mut path = self.clone();
        path.push_bit(bit);
        path
    }

    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().map(|&b| b == b'1')
    }

    pub fn is_prefix_of(&self, other: &BitPath) -> bool {
        other.bits.starts_with(&self.bits)
    }
}

impl fmt::Display for BitPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // only '0' and '1' are ever stored
        f.write_str(&String::from_utf8_lossy(&self.bits))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_push_and_child() {
        let mut path = BitPath::new();
        path.push_bit(true);
        path.push_bit(false);
        let longer = path.child(true);
        assert_eq!(path.as_bytes(), b"10");
        assert_eq!(longer.as_bytes(), b"101");
        assert!(path.is_prefix_of(&longer));
        assert!(!longer.is_prefix_of(&path));
        assert_eq!(longer.bits().collect::<Vec<_>>(), vec![true, false, true]);
    }

    #[test]
    fn test_parse() {
        assert_eq!(BitPath::parse(b"0110").map(|p| p.to_string()), Some("0110".to_string()));
        assert!(BitPath::parse(b"").is_none());
        assert!(BitPath::parse(b"01a").is_none());
        assert!(BitPath::parse(b"01 ").is_none());
    }
}
