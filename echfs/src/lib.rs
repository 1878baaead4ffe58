//! # echfs 驱动
//!
//! echfs 是一种树状结构的磁盘文件系统：
//! 卷首的超级块描述布局，分配链表（等价于FAT）把每个数据块指向后继，
//! 目录表则是一张平铺的定长记录表，每条记录对应一个文件或目录。
//!
//! 驱动自下而上分为：
//! 磁盘字节访问层（`disk`）、磁盘数据结构层（[`layout`]）、
//! 链表遍历与单块缓存（`chain`、`cache`）、
//! 挂载与句柄（`mount`、`handle`），
//! 最上层的 [`EchFileSystem`] 向VFS提供
//! `mount`/`open`/`read`/`lseek`/`close`/`fstat`。
//!
//! 本驱动只读：格式虽然定义了脏缓存状态，但没有任何回写路径。

#![no_std]

extern crate alloc;

mod cache;
mod chain;
mod disk;
mod error;
mod fs;
mod handle;
pub mod layout;
mod mount;
mod path;

pub use self::{
    error::{ChainError, Error, HandleError, MountError, PathError, SeekError},
    fs::{EchFileSystem, Fd},
    mount::MountId,
    path::Resolution,
};

/// 卷首第4字节起的魔数
pub const SIGNATURE: [u8; 8] = *b"_ECH_FS_";

/// 卷首保留的启动块数
pub const RESERVED_BLOCKS: u64 = 16;

/// 根目录的目录号，目录表中没有对应记录
pub const ROOT_ID: u64 = 0xffff_ffff_ffff_ffff;

/// 分配链表的链尾哨兵
pub const END_OF_CHAIN: u64 = 0xffff_ffff_ffff_ffff;

/// 已删除记录的`parent_id`哨兵
pub const DELETED_ENTRY: u64 = 0xffff_ffff_ffff_fffe;

/// 保留记录的`parent_id`哨兵
pub const RESERVED_SLOT: u64 = 0xffff_ffff_ffff_fff0;
