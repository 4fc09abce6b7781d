use std::collections::BTreeMap;

use crate::config::arch_config::WordType;

/// Read-only program image, keyed by word-aligned address.
///
/// Built once by the loader and never mutated by the simulation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rom {
    words: BTreeMap<WordType, u32>,
}

impl Rom {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a word. `addr` is aligned down to a word boundary.
    pub fn insert(&mut self, addr: WordType, word: u32) {
        self.words.insert(addr & !0b11, word);
    }

    pub fn word(&self, addr: WordType) -> Option<u32> {
        self.words.get(&(addr & !0b11)).copied()
    }

    /// Reconstruct the little-endian byte at `addr` from its containing word.
    pub fn byte(&self, addr: WordType) -> Option<u8> {
        let shift = (addr & 0b11) * 8;
        self.word(addr).map(|word| (word >> shift) as u8)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (WordType, u32)> + '_ {
        self.words.iter().map(|(addr, word)| (*addr, *word))
    }
}

impl FromIterator<(WordType, u32)> for Rom {
    fn from_iter<I: IntoIterator<Item = (WordType, u32)>>(iter: I) -> Self {
        let mut rom = Rom::new();
        for (addr, word) in iter {
            rom.insert(addr, word);
        }
        rom
    }
}

impl From<&[u32]> for Rom {
    /// Place `words` consecutively from address 0.
    fn from(words: &[u32]) -> Self {
        words
            .iter()
            .enumerate()
            .map(|(i, word)| ((i * 4) as WordType, *word))
            .collect()
    }
}
