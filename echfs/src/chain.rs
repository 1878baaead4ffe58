//! # 分配链表遍历
//!
//! 从文件的首块出发，沿`chain[block] = next`一路收集块号，
//! 直到读出链尾哨兵，产出文件的分配表。

use alloc::vec::Vec;

use crate::mount::Mount;
use crate::{ChainError, END_OF_CHAIN};

/// 收集从`first`出发的整条块链。
///
/// 损坏的镜像可能成环或指向表外，遍历以总块数为上限：
/// 超限即返回 [`ChainError::Unterminated`]，绝不无界循环。
/// 空文件的首块即链尾哨兵，产出空表。
pub(crate) fn walk(mnt: &Mount, first: u64) -> Result<Vec<u64>, ChainError> {
    let mut map = Vec::new();
    let mut block = first;

    for _ in 0..=mnt.total_blocks() {
        if block == END_OF_CHAIN {
            return Ok(map);
        }
        if block >= mnt.total_blocks() {
            return Err(ChainError::Unterminated);
        }

        map.push(block);
        block = mnt.chain_entry(block);
    }

    Err(ChainError::Unterminated)
}
