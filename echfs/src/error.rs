//! 驱动的错误分类。
//!
//! 每个阶段各有一枚错误枚举，公开接口统一返回 [`Error`]。
//! 没有任何重试或自动恢复：靠近文件尾的截断读取是成功路径，不是错误。

use derive_more::From;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountError {
    /// 卷首魔数不符
    SignatureMismatch,
    /// 每块字节数为零或不是扇区的整数倍
    UnsupportedBlockSize,
    /// 几何字段的区域推导回绕，或区域超出卷界
    BadGeometry,
    /// 挂载号没有对应的挂载记录
    UnknownMount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathError {
    ComponentNotFound,
    ComponentNotADirectory,
    /// 路径分量超出目录记录的名字容量
    NameTooLong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleError {
    InvalidIndex,
    AlreadyClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekError {
    OutOfBounds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainError {
    /// 链表在遍历上限内未到达链尾哨兵，镜像已损坏
    Unterminated,
    /// 分配链表覆盖不到文件声称的长度
    Truncated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, From)]
pub enum Error {
    Mount(MountError),
    Path(PathError),
    Handle(HandleError),
    Seek(SeekError),
    Chain(ChainError),
}
