//! 文件系统驱动与VFS调度层交换的公共类型。

#![no_std]

mod flags;
mod stat;

pub use self::{
    flags::{OpenFlag, Whence},
    stat::{DirEntryType, Stat},
};
