//! # 驱动服务对象
//!
//! [`EchFileSystem`] 持有挂载表与句柄表，VFS调度层消费的全部操作
//! 都从这里进入。句柄号是竞技场槽位：关闭的槽位优先复用。
//!
//! 互斥策略（上游实现没有任何互斥，这里是必须的补充）：
//! 挂载表与句柄表各一把锁，每卷的缓存文件注册表一把锁，
//! 每个缓存文件自身一把锁。读写全程持有句柄表锁，
//! 取锁顺序恒为句柄表 → 缓存文件。

use alloc::sync::Arc;
use alloc::vec::Vec;

use block_dev::BlockDevice;
use derive_more::{From, Into};
use enumflags2::BitFlags;
use spin::Mutex;
use vfs::{DirEntryType, OpenFlag, Stat, Whence};

use crate::handle::Handle;
use crate::layout::EntryKind;
use crate::mount::{Mount, MountId};
use crate::path::{self, Resolution};
use crate::{Error, HandleError, MountError, PathError};

/// 不透明的文件句柄号
#[derive(Debug, Clone, Copy, PartialEq, Eq, From, Into)]
#[repr(transparent)]
pub struct Fd(usize);

pub struct EchFileSystem {
    mounts: Mutex<Vec<Arc<Mount>>>,
    /// `None`即空闲槽位
    handles: Mutex<Vec<Option<Handle>>>,
}

impl EchFileSystem {
    pub const fn new() -> Self {
        Self {
            mounts: Mutex::new(Vec::new()),
            handles: Mutex::new(Vec::new()),
        }
    }

    /// 挂载一卷。
    ///
    /// 校验魔数并推导区域布局；失败时释放设备句柄，除此之外无需回滚。
    /// 挂载记录没有卸载路径。
    pub fn mount(&self, source: &str, dev: Arc<dyn BlockDevice>) -> Result<MountId, Error> {
        let mount = Mount::new(source, dev).inspect_err(|e| match e {
            MountError::SignatureMismatch => {
                log::error!("{source}: echfs signature invalid, mount failed!");
            }
            e => log::error!("{source}: mount failed: {e:?}"),
        })?;

        let mut mounts = self.mounts.lock();
        mounts.push(Arc::new(mount));

        Ok(MountId::from(mounts.len() - 1))
    }

    /// 以文件类型解析`path`并建立句柄。
    ///
    /// 任何一级解析失败都是错误；命中后复用或构建该路径的缓存文件。
    pub fn open(
        &self,
        mnt: MountId,
        path: &str,
        flags: BitFlags<OpenFlag>,
    ) -> Result<Fd, Error> {
        let mount = self
            .mounts
            .lock()
            .get(usize::from(mnt))
            .cloned()
            .ok_or(MountError::UnknownMount)?;

        let entry = match path::resolve(&mount, path, EntryKind::File)? {
            Resolution::Found { entry, .. } => entry,
            // 创建文件不在职责内，末分量缺失同样以未找到告终
            Resolution::NotFound { .. } | Resolution::Root => {
                return Err(PathError::ComponentNotFound.into());
            }
        };

        let file = mount.cached_file(path, entry.payload)?;
        let handle = Handle::new(mount, flags, entry.size, file);

        let mut handles = self.handles.lock();
        let fd = match handles.iter().position(Option::is_none) {
            Some(free) => {
                handles[free] = Some(handle);
                free
            }
            None => {
                handles.push(Some(handle));
                handles.len() - 1
            }
        };

        Ok(Fd::from(fd))
    }

    /// 解析一条路径，末分量按`kind`检索。
    ///
    /// 与 [`open`] 不同，末分量缺失不是错误：[`Resolution::NotFound`]
    /// 仍带回父目录与末分量名字，给将来的"打开即创建"留路。
    ///
    /// [`open`]: EchFileSystem::open
    pub fn resolve(
        &self,
        mnt: MountId,
        path: &str,
        kind: EntryKind,
    ) -> Result<Resolution, Error> {
        let mount = self
            .mounts
            .lock()
            .get(usize::from(mnt))
            .cloned()
            .ok_or(MountError::UnknownMount)?;

        Ok(path::resolve(&mount, path, kind)?)
    }

    /// 从句柄的游标处读取至多`buf.len()`字节，返回实际读得的字节数。
    pub fn read(&self, fd: Fd, buf: &mut [u8]) -> Result<usize, Error> {
        let mut handles = self.handles.lock();
        busy_handle(&mut handles, fd)?.read(buf)
    }

    /// 移动句柄的游标，返回新位置。
    pub fn lseek(&self, fd: Fd, offset: i64, whence: Whence) -> Result<u64, Error> {
        let mut handles = self.handles.lock();
        Ok(busy_handle(&mut handles, fd)?.seek(offset, whence)?)
    }

    /// 释放句柄槽位。缓存文件与挂载记录同寿，不随句柄释放。
    pub fn close(&self, fd: Fd) -> Result<(), Error> {
        let mut handles = self.handles.lock();
        let slot = handles
            .get_mut(usize::from(fd))
            .ok_or(HandleError::InvalidIndex)?;

        if slot.take().is_none() {
            return Err(HandleError::AlreadyClosed.into());
        }
        Ok(())
    }

    pub fn fstat(&self, fd: Fd) -> Result<Stat, Error> {
        let mut handles = self.handles.lock();
        let handle = busy_handle(&mut handles, fd)?;

        Ok(Stat {
            mode: DirEntryType::Regular,
            block_size: handle.mount().bytes_per_block(),
            blocks: handle.file().lock().blocks(),
            size: handle.size(),
        })
    }
}

impl Default for EchFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

fn busy_handle(handles: &mut [Option<Handle>], fd: Fd) -> Result<&mut Handle, HandleError> {
    handles
        .get_mut(usize::from(fd))
        .ok_or(HandleError::InvalidIndex)?
        .as_mut()
        .ok_or(HandleError::AlreadyClosed)
}
