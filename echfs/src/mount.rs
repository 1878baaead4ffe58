//! # 挂载记录
//!
//! 一条 [`Mount`] 对应一卷：持有设备句柄、推导出的区域布局，
//! 以及本卷打开过的所有 [`CachedFile`]。
//! 挂载记录没有卸载路径，缓存文件也从不淘汰，二者同寿。

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use block_dev::BlockDevice;
use derive_more::{From, Into};
use spin::Mutex;

use crate::cache::CachedFile;
use crate::layout::{Entry, Layout, Superblock, ENTRY_SIZE, SUPERBLOCK_SIZE};
use crate::{chain, disk};
use crate::{ChainError, MountError};

/// 不透明的挂载号，即挂载表的下标
#[derive(Debug, Clone, Copy, PartialEq, Eq, From, Into)]
#[repr(transparent)]
pub struct MountId(usize);

pub(crate) struct Mount {
    dev: Arc<dyn BlockDevice>,
    name: String,
    blocks: u64,
    bytes_per_block: u64,
    layout: Layout,
    /// 本卷打开过的文件，以完整路径为键，从不淘汰
    cached: Mutex<Vec<(String, Arc<Mutex<CachedFile>>)>>,
}

impl Mount {
    pub(crate) fn new(source: &str, dev: Arc<dyn BlockDevice>) -> Result<Self, MountError> {
        let sb = {
            let mut raw = [0u8; SUPERBLOCK_SIZE];
            disk::read_at(&*dev, 0, &mut raw);
            Superblock::decode(&raw)?
        };
        let layout = Layout::derive(&sb)?;

        log::debug!("echfs mounted with:");
        log::debug!("blocks:        {}", sb.blocks);
        log::debug!("bytesperblock: {}", sb.bytes_per_block);
        log::debug!("fatsize:       {}", layout.fat_size);
        log::debug!("fatstart:      {}", layout.fat_start);
        log::debug!("dirsize:       {}", layout.dir_size);
        log::debug!("dirstart:      {}", layout.dir_start);
        log::debug!("datastart:     {}", layout.data_start);

        Ok(Self {
            dev,
            name: String::from(source),
            blocks: sb.blocks,
            bytes_per_block: sb.bytes_per_block,
            layout,
            cached: Mutex::new(Vec::new()),
        })
    }

    #[inline]
    pub(crate) fn dev(&self) -> &dyn BlockDevice {
        &*self.dev
    }

    #[inline]
    pub(crate) fn total_blocks(&self) -> u64 {
        self.blocks
    }

    #[inline]
    pub(crate) fn bytes_per_block(&self) -> u64 {
        self.bytes_per_block
    }

    /// 目录表的记录容量
    #[inline]
    pub(crate) fn dir_capacity(&self) -> u64 {
        self.layout.dir_size * (self.bytes_per_block / ENTRY_SIZE as u64)
    }

    /// 读取目录表第`index`条记录
    pub(crate) fn read_entry(&self, index: u64) -> Entry {
        let offset = self.layout.dir_start * self.bytes_per_block + index * ENTRY_SIZE as u64;
        let mut raw = [0u8; ENTRY_SIZE];
        disk::read_at(&*self.dev, offset, &mut raw);
        Entry::decode(&raw)
    }

    /// 读取分配链表中块`block`的后继
    pub(crate) fn chain_entry(&self, block: u64) -> u64 {
        let offset = self.layout.fat_start * self.bytes_per_block + block * 8;
        disk::read_u64(&*self.dev, offset)
    }

    /// 查找`path`对应的缓存文件；不存在则遍历分配链表新建一个。
    ///
    /// 同一路径上的所有句柄共享同一个缓存文件，
    /// 单块缓存的内容以最后一次读取为准。
    pub(crate) fn cached_file(
        &self,
        path: &str,
        first_block: u64,
    ) -> Result<Arc<Mutex<CachedFile>>, ChainError> {
        let mut cached = self.cached.lock();

        if let Some(file) = cached
            .iter()
            .find_map(|(p, file)| (p == path).then(|| file.clone()))
        {
            return Ok(file);
        }

        let map = chain::walk(self, first_block)?;
        log::trace!(
            "{}: built allocation map for {path:?} ({} blocks)",
            self.name,
            map.len()
        );

        let file = Arc::new(Mutex::new(CachedFile::new(map, self.bytes_per_block)));
        cached.push((String::from(path), file.clone()));

        Ok(file)
    }
}
