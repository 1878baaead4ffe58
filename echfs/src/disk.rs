//! # 磁盘字节访问层
//!
//! [`BlockDevice`] 以扇区为粒度，而超级块字段、目录记录与链表项
//! 都按字节偏移寻址，本层在两者之间换算。
//! 元数据的读取不经过任何缓存，与数据块的单块缓存互不干扰。

use block_dev::{BlockDevice, SECTOR_SIZE};

/// 从设备的字节偏移`offset`处读满`buf`，跨扇区时逐扇区拷贝。
pub(crate) fn read_at(dev: &dyn BlockDevice, offset: u64, buf: &mut [u8]) {
    let mut sector = offset as usize / SECTOR_SIZE;
    let mut start = offset as usize % SECTOR_SIZE;
    let mut copied = 0;
    let mut tmp = [0u8; SECTOR_SIZE];

    while copied < buf.len() {
        dev.read_block(sector, &mut tmp);
        let n = (SECTOR_SIZE - start).min(buf.len() - copied);
        buf[copied..copied + n].copy_from_slice(&tmp[start..start + n]);
        copied += n;
        start = 0;
        sector += 1;
    }
}

/// 读取字节偏移`offset`处的小端64位字
pub(crate) fn read_u64(dev: &dyn BlockDevice, offset: u64) -> u64 {
    let mut buf = [0u8; 8];
    read_at(dev, offset, &mut buf);
    u64::from_le_bytes(buf)
}
