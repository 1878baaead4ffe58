//! # 磁盘数据结构层
//!
//! 卷的布局：保留区（16块） | 分配链表区 | 目录表区 | 数据区
//!
//! 磁盘上的结构一律通过显式的逐字节编解码读写，
//! 不依赖内存中的结构体布局，保证各目标平台上磁盘字节一致。

mod entry;
mod super_block;

pub use self::{
    entry::{Entry, EntryKind, ENTRY_SIZE, FILENAME_LEN},
    super_block::{Layout, Superblock},
};

pub(crate) use self::super_block::SUPERBLOCK_SIZE;
