//! Dense bit set of game vertices.
//!
//! Frontier sets of the couple-rank solver are unions of earlier frontiers,
//! so they are stored as word-packed bit sets over the vertex arena.

use crate::types::VertexId;

/// A set of vertices backed by a vector of u64 words.
///
/// Each bit corresponds to a vertex index. The set grows as needed
/// when inserting vertices beyond the current capacity.
#[derive(Debug, Clone, Default)]
pub struct VertexSet {
    /// Storage: each u64 holds 64 bits
    words: Vec<u64>,
    /// Number of set bits (cached for O(1) len())
    count: usize,
}

impl VertexSet {
    const BITS_PER_WORD: usize = 64;

    /// Creates a new empty set able to hold `capacity` vertices without growing.
    pub fn new(capacity: usize) -> Self {
        Self {
            words: vec![0; capacity.div_ceil(Self::BITS_PER_WORD)],
            count: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    fn word_and_bit(v: VertexId) -> (usize, usize) {
        let index = v.index();
        (index / Self::BITS_PER_WORD, index % Self::BITS_PER_WORD)
    }

    #[inline]
    pub fn contains(&self, v: VertexId) -> bool {
        let (word_idx, bit_idx) = Self::word_and_bit(v);
        match self.words.get(word_idx) {
            Some(word) => (word & (1u64 << bit_idx)) != 0,
            None => false,
        }
    }

    /// Adds a vertex. Returns true if it was not already present.
    #[inline]
    pub fn insert(&mut self, v: VertexId) -> bool {
        let (word_idx, bit_idx) = Self::word_and_bit(v);
        if word_idx >= self.words.len() {
            self.words.resize(word_idx + 1, 0);
        }

        let mask = 1u64 << bit_idx;
        let was_clear = (self.words[word_idx] & mask) == 0;
        if was_clear {
            self.words[word_idx] |= mask;
            self.count += 1;
        }
        was_clear
    }

    /// Adds every vertex of `other`. Returns the number of newly added vertices.
    pub fn union_with(&mut self, other: &VertexSet) -> usize {
        if other.words.len() > self.words.len() {
            self.words.resize(other.words.len(), 0);
        }
        let before = self.count;
        for (mine, theirs) in self.words.iter_mut().zip(&other.words) {
            *mine |= theirs;
        }
        self.count = self.words.iter().map(|w| w.count_ones() as usize).sum();
        self.count - before
    }

    /// Returns true if every vertex of `self` is in `other`.
    pub fn is_subset(&self, other: &VertexSet) -> bool {
        self.words.iter().enumerate().all(|(i, &w)| {
            let theirs = other.words.get(i).copied().unwrap_or(0);
            w & !theirs == 0
        })
    }

    /// Returns an iterator over the vertices in increasing index order.
    pub fn iter(&self) -> VertexSetIter<'_> {
        VertexSetIter {
            set: self,
            word_idx: 0,
            current_word: self.words.first().copied().unwrap_or(0),
        }
    }
}

impl PartialEq for VertexSet {
    fn eq(&self, other: &Self) -> bool {
        self.count == other.count && self.is_subset(other)
    }
}

impl Eq for VertexSet {}

impl FromIterator<VertexId> for VertexSet {
    fn from_iter<T: IntoIterator<Item = VertexId>>(iter: T) -> Self {
        let mut set = VertexSet::default();
        for v in iter {
            set.insert(v);
        }
        set
    }
}

/// Iterator over the vertices of a [`VertexSet`].
pub struct VertexSetIter<'a> {
    set: &'a VertexSet,
    word_idx: usize,
    current_word: u64,
}

impl Iterator for VertexSetIter<'_> {
    type Item = VertexId;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current_word != 0 {
                let bit_idx = self.current_word.trailing_zeros() as usize;
                self.current_word &= self.current_word - 1; // Clear lowest set bit
                return Some(VertexId::new(self.word_idx * VertexSet::BITS_PER_WORD + bit_idx));
            }

            self.word_idx += 1;
            if self.word_idx >= self.set.words.len() {
                return None;
            }
            self.current_word = self.set.words[self.word_idx];
        }
    }
}
