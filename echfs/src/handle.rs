//! # 打开文件的游标
//!
//! [`Handle`] 是一条打开路径上的游标：
//! 当前位置`ptr`被夹在固定的`[begin, end]`之间，
//! `end`为打开时的文件长度；追加模式把`begin`也钉在文件尾，
//! 使游标永远不能落回打开时已有的数据之前。

use alloc::sync::Arc;

use enumflags2::BitFlags;
use spin::Mutex;
use vfs::{OpenFlag, Whence};

use crate::cache::CachedFile;
use crate::mount::Mount;
use crate::{Error, SeekError};

pub(crate) struct Handle {
    mnt: Arc<Mount>,
    #[allow(dead_code)]
    flags: BitFlags<OpenFlag>,
    ptr: u64,
    begin: u64,
    end: u64,
    /// 指向共享的缓存文件，而非副本
    file: Arc<Mutex<CachedFile>>,
}

impl Handle {
    pub(crate) fn new(
        mnt: Arc<Mount>,
        flags: BitFlags<OpenFlag>,
        size: u64,
        file: Arc<Mutex<CachedFile>>,
    ) -> Self {
        let end = size;
        let begin = if flags.contains(OpenFlag::Append) {
            end
        } else {
            0
        };

        Self {
            mnt,
            flags,
            ptr: begin,
            begin,
            end,
            file,
        }
    }

    /// 从游标处读取至多`buf.len()`字节。
    ///
    /// 越过文件尾的部分静默截断；游标已在尾部时读取0字节，不是错误。
    pub(crate) fn read(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        let count = (buf.len() as u64).min(self.end - self.ptr) as usize;
        if count == 0 {
            return Ok(0);
        }

        let bytes_per_block = self.mnt.bytes_per_block();
        let mut block = self.ptr / bytes_per_block;
        let mut offset = (self.ptr % bytes_per_block) as usize;
        let mut copied = 0;

        let mut file = self.file.lock();
        while copied < count {
            file.ensure(&self.mnt, block)?;

            let n = (bytes_per_block as usize - offset).min(count - copied);
            buf[copied..copied + n].copy_from_slice(&file.block()[offset..offset + n]);

            copied += n;
            offset = 0;
            block += 1;
        }

        self.ptr += count as u64;
        Ok(count)
    }

    /// 移动游标，返回新位置。出界的目标不改动任何状态。
    pub(crate) fn seek(&mut self, offset: i64, whence: Whence) -> Result<u64, SeekError> {
        self.ptr = seek_target(self.begin, self.ptr, self.end, offset, whence)?;
        Ok(self.ptr)
    }

    #[inline]
    pub(crate) fn size(&self) -> u64 {
        self.end
    }

    #[inline]
    pub(crate) fn mount(&self) -> &Mount {
        &self.mnt
    }

    #[inline]
    pub(crate) fn file(&self) -> &Mutex<CachedFile> {
        &self.file
    }
}

/// `Set`基于下界，`Cur`基于当前位置，`End`基于上界；
/// 结果必须落在`[begin, end]`闭区间内。
fn seek_target(
    begin: u64,
    ptr: u64,
    end: u64,
    offset: i64,
    whence: Whence,
) -> Result<u64, SeekError> {
    let base = match whence {
        Whence::Set => begin,
        Whence::Cur => ptr,
        Whence::End => end,
    };

    base.checked_add_signed(offset)
        .filter(|target| (begin..=end).contains(target))
        .ok_or(SeekError::OutOfBounds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seek_arithmetic() {
        assert_eq!(Ok(30), seek_target(0, 10, 100, 30, Whence::Set));
        assert_eq!(Ok(40), seek_target(0, 10, 100, 30, Whence::Cur));
        assert_eq!(Ok(70), seek_target(0, 10, 100, -30, Whence::End));
        assert_eq!(Ok(100), seek_target(0, 10, 100, 0, Whence::End));

        assert_eq!(
            Err(SeekError::OutOfBounds),
            seek_target(0, 10, 100, 101, Whence::Set)
        );
        assert_eq!(
            Err(SeekError::OutOfBounds),
            seek_target(0, 10, 100, -11, Whence::Cur)
        );
    }

    #[test]
    fn seek_respects_append_floor() {
        // 追加模式下 begin == end，位置被钉死
        assert_eq!(Ok(50), seek_target(50, 50, 50, 0, Whence::Set));
        assert_eq!(
            Err(SeekError::OutOfBounds),
            seek_target(50, 50, 50, -1, Whence::End)
        );
    }

    #[test]
    fn seek_rejects_overflowing_offset() {
        assert_eq!(
            Err(SeekError::OutOfBounds),
            seek_target(0, 0, u64::MAX, i64::MIN, Whence::Cur)
        );
    }
}
