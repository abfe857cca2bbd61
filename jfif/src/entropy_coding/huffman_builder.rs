// Copyright (c) the JFIF-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Builds length-limited canonical Huffman codes from observed symbol frequencies.
//!
//! The tree is built with the classic two-smallest merge. A sentinel leaf of frequency 1
//! is added before building and moved to the last canonical position, which is the all-ones
//! code of the longest length; dropping it afterwards guarantees that no real symbol gets an
//! all-ones code. Lengths above 16 are then folded back with the Annex K.3 procedure.

use std::collections::HashMap;
use std::hash::Hash;

use super::huffman::{HUFFMAN_MAX_BITS, HuffmanCode, HuffmanTable};
use crate::{
    error::{Error, Result},
    util::tracing_wrappers::*,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HuffmanSymbol<T> {
    pub value: T,
    pub frequency: u64,
}

/// Symbol library: frequencies in first-insertion order.
#[derive(Debug, Clone)]
pub struct HuffmanBuilder<T> {
    symbols: Vec<HuffmanSymbol<T>>,
    index: HashMap<T, usize>,
}

impl<T: Copy + Eq + Hash> Default for HuffmanBuilder<T> {
    fn default() -> Self {
        Self {
            symbols: Vec::new(),
            index: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum NodeKind {
    // `None` is the sentinel leaf.
    Leaf(Option<usize>),
    Internal { left: usize, right: usize },
}

#[derive(Debug, Clone, Copy)]
struct Node {
    frequency: u64,
    kind: NodeKind,
}

/// Output of [`HuffmanBuilder::build`]: the number of codes per length and the symbols in
/// canonical order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalCode<T> {
    counts: [usize; HUFFMAN_MAX_BITS],
    symbols: Vec<T>,
}

impl<T: Copy + Eq + Hash> HuffmanBuilder<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, value: T) {
        self.record_n(value, 1);
    }

    pub fn record_n(&mut self, value: T, count: u64) {
        match self.index.get(&value) {
            Some(&i) => self.symbols[i].frequency += count,
            None => {
                self.index.insert(value, self.symbols.len());
                self.symbols.push(HuffmanSymbol {
                    value,
                    frequency: count,
                });
            }
        }
    }

    pub fn frequency(&self, value: T) -> u64 {
        self.index
            .get(&value)
            .map_or(0, |&i| self.symbols[i].frequency)
    }

    pub fn symbols(&self) -> &[HuffmanSymbol<T>] {
        &self.symbols
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn build(&self) -> Result<CanonicalCode<T>> {
        if self.symbols.is_empty() {
            return Ok(CanonicalCode {
                counts: [0; HUFFMAN_MAX_BITS],
                symbols: Vec::new(),
            });
        }

        let leaves = self.code_lengths();
        let max_len = leaves.iter().map(|&(_, len)| len).max().unwrap_or(0);

        // Canonical order: by length, then by traversal order.
        let mut ordered = leaves;
        ordered.sort_by_key(|&(_, len)| len);
        let last = ordered.len() - 1;
        if let Some(pos) = ordered.iter().position(|&(leaf, _)| leaf.is_none()) {
            ordered.swap(pos, last);
        }

        let mut bins = vec![0usize; (max_len + 1).max(2 * HUFFMAN_MAX_BITS + 1)];
        for &(_, len) in &ordered {
            bins[len] += 1;
        }
        adjust_bins(&mut bins)?;

        let mut counts = [0; HUFFMAN_MAX_BITS];
        counts.copy_from_slice(&bins[1..=HUFFMAN_MAX_BITS]);
        let symbols: Vec<T> = ordered[..last]
            .iter()
            .filter_map(|&(leaf, _)| leaf.map(|i| self.symbols[i].value))
            .collect();
        if counts.iter().sum::<usize>() != symbols.len() {
            return Err(Error::InvalidHuffmanHistogram);
        }
        trace!(?counts, num_symbols = symbols.len(), max_len, "built Huffman code");
        Ok(CanonicalCode { counts, symbols })
    }

    /// Builds the tree and returns `(leaf, depth)` pairs in depth-first, left-first order.
    fn code_lengths(&self) -> Vec<(Option<usize>, usize)> {
        let mut nodes: Vec<Node> = self
            .symbols
            .iter()
            .enumerate()
            .map(|(i, s)| Node {
                frequency: s.frequency,
                kind: NodeKind::Leaf(Some(i)),
            })
            .collect();
        nodes.push(Node {
            frequency: 1,
            kind: NodeKind::Leaf(None),
        });

        let mut active: Vec<usize> = (0..nodes.len()).collect();
        while active.len() > 1 {
            let left = take_min(&mut active, &nodes);
            let right = take_min(&mut active, &nodes);
            active.push(nodes.len());
            nodes.push(Node {
                frequency: nodes[left].frequency + nodes[right].frequency,
                kind: NodeKind::Internal { left, right },
            });
        }

        let mut out = Vec::with_capacity(self.symbols.len() + 1);
        let mut stack = vec![(active[0], 0usize)];
        while let Some((node, depth)) = stack.pop() {
            match nodes[node].kind {
                NodeKind::Leaf(leaf) => out.push((leaf, depth.max(1))),
                NodeKind::Internal { left, right } => {
                    stack.push((right, depth + 1));
                    stack.push((left, depth + 1));
                }
            }
        }
        out
    }
}

/// Removes and returns the first active node with the smallest frequency.
fn take_min(active: &mut Vec<usize>, nodes: &[Node]) -> usize {
    let mut best = 0;
    for i in 1..active.len() {
        if nodes[active[i]].frequency < nodes[active[best]].frequency {
            best = i;
        }
    }
    active.remove(best)
}

/// Limits code lengths to 16 bits (Annex K.3, figure K.3) and removes the reserved code from
/// the longest populated length. `bins[len]` is the number of codes of length `len`.
pub fn adjust_bins(bins: &mut [usize]) -> Result<()> {
    if bins.len() <= HUFFMAN_MAX_BITS || bins.iter().sum::<usize>() < 2 || bins[0] != 0 {
        return Err(Error::InvalidHuffmanHistogram);
    }
    let mut i = bins.len() - 1;
    while i > HUFFMAN_MAX_BITS {
        if bins[i] == 0 {
            i -= 1;
            continue;
        }
        if bins[i] < 2 {
            return Err(Error::InvalidHuffmanHistogram);
        }
        let mut j = i - 2;
        while bins[j] == 0 {
            if j == 1 {
                return Err(Error::InvalidHuffmanHistogram);
            }
            j -= 1;
        }
        bins[i] -= 2;
        bins[i - 1] += 1;
        bins[j + 1] += 2;
        bins[j] -= 1;
    }
    while bins[i] == 0 {
        if i == 1 {
            return Err(Error::InvalidHuffmanHistogram);
        }
        i -= 1;
    }
    bins[i] -= 1;
    Ok(())
}

impl<T: Copy> CanonicalCode<T> {
    /// Number of codes of each length; entry `i` is for length `i + 1`.
    pub fn counts(&self) -> &[usize; HUFFMAN_MAX_BITS] {
        &self.counts
    }

    pub fn symbols(&self) -> &[T] {
        &self.symbols
    }

    /// Pairs every symbol with its canonical code.
    pub fn codes(&self) -> Vec<(T, HuffmanCode)> {
        let mut out = Vec::with_capacity(self.symbols.len());
        let mut code = 0u32;
        let mut next = 0;
        for len in 1..=HUFFMAN_MAX_BITS {
            for &symbol in &self.symbols[next..next + self.counts[len - 1]] {
                out.push((
                    symbol,
                    HuffmanCode {
                        code: code as u16,
                        len: len as u8,
                    },
                ));
                code += 1;
            }
            next += self.counts[len - 1];
            code <<= 1;
        }
        out
    }
}

impl CanonicalCode<u8> {
    pub fn to_table(&self) -> Result<HuffmanTable> {
        let mut counts = [0u8; HUFFMAN_MAX_BITS];
        for (dst, &src) in counts.iter_mut().zip(self.counts.iter()) {
            *dst = u8::try_from(src).map_err(|_| Error::InvalidHuffmanHistogram)?;
        }
        HuffmanTable::new(counts, self.symbols.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn assert_prefix_free_without_all_ones(codes: &[(u8, HuffmanCode)]) {
        for (i, &(_, a)) in codes.iter().enumerate() {
            assert!(a.len as usize <= HUFFMAN_MAX_BITS);
            assert_ne!(a.code as u32, (1u32 << a.len) - 1, "all-ones code {a:?}");
            for &(_, b) in &codes[i + 1..] {
                let (short, long) = if a.len <= b.len { (a, b) } else { (b, a) };
                let prefix = long.code >> (long.len - short.len);
                assert_ne!(prefix, short.code, "{short:?} is a prefix of {long:?}");
            }
        }
    }

    fn build(frequencies: &[(u8, u64)]) -> CanonicalCode<u8> {
        let mut builder = HuffmanBuilder::new();
        for &(s, f) in frequencies {
            builder.record_n(s, f);
        }
        builder.build().unwrap()
    }

    #[test]
    fn empty_input() {
        let code = HuffmanBuilder::<u8>::new().build().unwrap();
        assert!(code.symbols().is_empty());
        assert_eq!(code.counts(), &[0; HUFFMAN_MAX_BITS]);
    }

    #[test]
    fn single_symbol_gets_one_bit() {
        for freq in [1, 7] {
            let code = build(&[(42, freq)]);
            assert_eq!(code.codes(), vec![(42, HuffmanCode { code: 0, len: 1 })]);
        }
    }

    #[test]
    fn record_accumulates() {
        let mut builder = HuffmanBuilder::new();
        builder.record(3u8);
        builder.record(5);
        builder.record(3);
        assert_eq!(builder.frequency(3), 2);
        assert_eq!(builder.frequency(5), 1);
        assert_eq!(builder.frequency(9), 0);
        assert_eq!(builder.symbols()[0].value, 3);
    }

    #[test]
    fn frequent_symbols_get_shorter_codes() {
        let code = build(&[(1, 100), (2, 50), (3, 10), (4, 10), (5, 1)]);
        let codes = code.codes();
        let len_of = |s: u8| codes.iter().find(|(v, _)| *v == s).unwrap().1.len;
        assert!(len_of(1) <= len_of(2));
        assert!(len_of(2) <= len_of(3));
        assert!(len_of(3) <= len_of(5));
        assert_prefix_free_without_all_ones(&codes);
    }

    #[test]
    fn lengths_are_limited_to_16_bits() {
        // Fibonacci frequencies produce a maximally skewed tree.
        let mut frequencies = vec![];
        let (mut a, mut b) = (1u64, 1u64);
        for s in 0..40u8 {
            frequencies.push((s, a));
            (a, b) = (b, a + b);
        }
        let code = build(&frequencies);
        let mut symbols = code.symbols().to_vec();
        symbols.sort();
        assert_eq!(symbols, (0..40).collect::<Vec<u8>>());
        let codes = code.codes();
        assert!(codes.iter().any(|(_, c)| c.len as usize == HUFFMAN_MAX_BITS));
        assert_prefix_free_without_all_ones(&codes);
    }

    #[test]
    fn full_byte_alphabet() {
        let frequencies: Vec<(u8, u64)> = (0..=255u8).map(|s| (s, 1 + s as u64 % 7)).collect();
        let code = build(&frequencies);
        assert_eq!(code.symbols().len(), 256);
        assert_prefix_free_without_all_ones(&code.codes());
    }

    #[test]
    fn table_matches_builder_codes() {
        let code = build(&[(0, 5), (1, 3), (0x11, 9), (0xf0, 1), (0x22, 2)]);
        let table = code.to_table().unwrap();
        let from_table: Vec<_> = table.codes().collect();
        assert_eq!(from_table, code.codes());
    }

    #[test]
    fn random_frequencies_give_valid_codes() {
        arbtest::arbtest(|u| {
            let frequencies: Vec<(u8, u16)> = u.arbitrary()?;
            let mut builder = HuffmanBuilder::new();
            for (s, f) in frequencies {
                builder.record_n(s, f as u64 + 1);
            }
            let code = builder.build().unwrap();
            assert_eq!(code.symbols().len(), builder.symbols().len());
            assert_prefix_free_without_all_ones(&code.codes());
            Ok(())
        });
    }

    #[test]
    fn adjust_bins_guards_degenerate_histograms() {
        let mut bins = vec![0; 33];
        assert!(adjust_bins(&mut bins).is_err());
        bins[3] = 1;
        assert!(adjust_bins(&mut bins).is_err());
        bins[1] = 2;
        bins[3] = 0;
        adjust_bins(&mut bins).unwrap();
        assert_eq!(bins[1], 1);
    }

    #[test]
    fn adjust_bins_folds_long_codes() {
        // One code at each length 1..=19 plus a second one at 19: a complete skewed tree.
        let mut bins = vec![0; 33];
        for len in 1..=19 {
            bins[len] = 1;
        }
        bins[19] = 2;
        let total: usize = bins.iter().sum();
        adjust_bins(&mut bins).unwrap();
        assert!(bins[17..].iter().all(|&b| b == 0));
        assert_eq!(bins.iter().sum::<usize>(), total - 1);
        let kraft: f64 = (1..=16).map(|l| bins[l] as f64 / (1u64 << l) as f64).sum();
        assert!(kraft < 1.0);
    }
}
