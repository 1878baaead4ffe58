//! # 单块缓存
//!
//! 每条打开过的路径对应一个 [`CachedFile`]：
//! 持有文件的分配表和一块大小的缓冲区，任意时刻只驻留一个块。
//! 它与挂载记录同寿，由同一路径上的所有句柄共享。

use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;

use crate::disk;
use crate::mount::Mount;
use crate::ChainError;

/// 缓冲区状态。[`Dirty`]为写支持预留，当前不会被置位。
///
/// [`Dirty`]: CacheStatus::Dirty
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CacheStatus {
    NotReady,
    Ready,
    #[allow(dead_code)]
    Dirty,
}

pub(crate) struct CachedFile {
    /// 文件数据块的块号序列，链尾哨兵不计入
    alloc_map: Vec<u64>,
    /// 一块大小的缓冲区
    cache: Box<[u8]>,
    /// 当前驻留的块在分配表中的下标
    cached_block: u64,
    status: CacheStatus,
}

impl CachedFile {
    pub(crate) fn new(alloc_map: Vec<u64>, bytes_per_block: u64) -> Self {
        Self {
            alloc_map,
            cache: vec![0; bytes_per_block as usize].into(),
            cached_block: 0,
            status: CacheStatus::NotReady,
        }
    }

    /// 保证文件第`block`块驻留在缓冲区中，命中时不产生I/O。
    pub(crate) fn ensure(&mut self, mnt: &Mount, block: u64) -> Result<(), ChainError> {
        if self.cached_block == block && self.status == CacheStatus::Ready {
            return Ok(());
        }

        // 读取范围已截断到文件长度之内，分配表覆盖不到即镜像不自洽
        let Some(&disk_block) = self.alloc_map.get(block as usize) else {
            return Err(ChainError::Truncated);
        };

        disk::read_at(
            mnt.dev(),
            disk_block * mnt.bytes_per_block(),
            &mut self.cache,
        );
        self.cached_block = block;
        self.status = CacheStatus::Ready;

        Ok(())
    }

    /// 驻留块的数据
    #[inline]
    pub(crate) fn block(&self) -> &[u8] {
        &self.cache
    }

    /// 文件占据的块数
    #[inline]
    pub(crate) fn blocks(&self) -> u64 {
        self.alloc_map.len() as u64
    }
}
