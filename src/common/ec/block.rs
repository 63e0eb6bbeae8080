use std::ops::Deref;

use super::ecc;
use crate::common::metadata::{ECLevel, Version};

// Codeword block
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Clone)]
pub(crate) struct Block<'a> {
    data: &'a [u8],
    ecc: Vec<u8>,
}

impl<'a> Block<'a> {
    pub fn new(data: &'a [u8], ecc_len: usize) -> Self {
        Self { data, ecc: ecc(data, ecc_len) }
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    pub fn ecc(&self) -> &[u8] {
        &self.ecc
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.data.len() + self.ecc.len()
    }
}

// Splits data codewords into group 1 blocks followed by group 2 blocks and
// computes the ecc of each
pub(crate) fn blockify(data: &[u8], version: Version, ec_level: ECLevel) -> Vec<Block<'_>> {
    let (block1_size, block1_count, block2_size, block2_count) =
        version.data_codewords_per_block(ec_level);

    let total_blocks = block1_count + block2_count;
    let total_block1_size = block1_size * block1_count;
    let total_size = total_block1_size + block2_size * block2_count;

    debug_assert!(
        total_size == data.len(),
        "Data len doesn't match total size of blocks: Data len {}, Total block size {}",
        data.len(),
        total_size
    );

    let ecc_len = version.ecc_per_block(ec_level);
    let mut blocks = Vec::with_capacity(total_blocks);
    blocks.extend(data[..total_block1_size].chunks(block1_size).map(|b| Block::new(b, ecc_len)));
    if block2_size > 0 {
        blocks.extend(data[total_block1_size..].chunks(block2_size).map(|b| Block::new(b, ecc_len)));
    }
    blocks
}

// Reads blocks column by column; exhausted blocks are skipped
pub(crate) fn interleave<T: Copy, V: Deref<Target = [T]>>(blocks: &[V]) -> Vec<T> {
    let max_block_size = blocks.iter().map(|b| b.len()).max().unwrap_or(0);
    let total_size = blocks.iter().map(|b| b.len()).sum::<usize>();
    let mut res = Vec::with_capacity(total_size);
    for i in 0..max_block_size {
        for b in blocks {
            if i < b.len() {
                res.push(b[i]);
            }
        }
    }
    res
}

// Final codeword sequence: interleaved data followed by interleaved ecc
pub(crate) fn interleave_blocks(blocks: &[Block]) -> Vec<u8> {
    let data_blocks = blocks.iter().map(|b| b.data()).collect::<Vec<_>>();
    let ecc_blocks = blocks.iter().map(|b| b.ecc()).collect::<Vec<_>>();
    let mut res = interleave(&data_blocks);
    res.extend(interleave(&ecc_blocks));
    res
}
