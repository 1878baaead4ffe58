use crate::{MountError, RESERVED_BLOCKS, SIGNATURE};

/// 超级块：
/// - 校验卷的合法性；
/// - 描述卷的几何，用于推导各区域的起点。
///
/// 磁盘上各字段的字节偏移（从卷首起算）：
/// 魔数位于4，总块数位于12，目录区块数位于20，每块字节数位于28。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Superblock {
    /// 卷的总块数
    pub blocks: u64,
    /// 目录表区占据的块数
    pub dir_blocks: u64,
    /// 一块的字节量
    pub bytes_per_block: u64,
}

/// 超级块占据的卷首字节量
pub(crate) const SUPERBLOCK_SIZE: usize = 36;

const SIGNATURE_OFFSET: usize = 4;
const BLOCKS_OFFSET: usize = 12;
const DIR_BLOCKS_OFFSET: usize = 20;
const BYTES_PER_BLOCK_OFFSET: usize = 28;

impl Superblock {
    pub fn decode(raw: &[u8; SUPERBLOCK_SIZE]) -> Result<Self, MountError> {
        if raw[SIGNATURE_OFFSET..SIGNATURE_OFFSET + 8] != SIGNATURE {
            return Err(MountError::SignatureMismatch);
        }

        Ok(Self {
            blocks: read_qword(raw, BLOCKS_OFFSET),
            dir_blocks: read_qword(raw, DIR_BLOCKS_OFFSET),
            bytes_per_block: read_qword(raw, BYTES_PER_BLOCK_OFFSET),
        })
    }

    pub fn encode(&self, raw: &mut [u8]) {
        raw[SIGNATURE_OFFSET..SIGNATURE_OFFSET + 8].copy_from_slice(&SIGNATURE);
        raw[BLOCKS_OFFSET..BLOCKS_OFFSET + 8].copy_from_slice(&self.blocks.to_le_bytes());
        raw[DIR_BLOCKS_OFFSET..DIR_BLOCKS_OFFSET + 8]
            .copy_from_slice(&self.dir_blocks.to_le_bytes());
        raw[BYTES_PER_BLOCK_OFFSET..BYTES_PER_BLOCK_OFFSET + 8]
            .copy_from_slice(&self.bytes_per_block.to_le_bytes());
    }
}

#[inline]
fn read_qword(raw: &[u8], offset: usize) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&raw[offset..offset + 8]);
    u64::from_le_bytes(buf)
}

/// 各区域的起始块号，由超级块推导
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub fat_start: u64,
    pub fat_size: u64,
    pub dir_start: u64,
    pub dir_size: u64,
    pub data_start: u64,
}

impl Layout {
    /// 由超级块推导各区域。几何字段来自磁盘，算术全程防回绕；
    /// 推导成功即保证各区域落在卷内、卷的字节总量可用`u64`表示，
    /// 此后卷内的偏移乘加不会回绕。
    pub fn derive(sb: &Superblock) -> Result<Self, MountError> {
        if sb.bytes_per_block == 0 || sb.bytes_per_block % block_dev::SECTOR_SIZE as u64 != 0 {
            return Err(MountError::UnsupportedBlockSize);
        }

        let table_bytes = sb.blocks.checked_mul(8).ok_or(MountError::BadGeometry)?;
        let fat_size = table_bytes.div_ceil(sb.bytes_per_block);
        let fat_start = RESERVED_BLOCKS;
        let dir_start = fat_start + fat_size;
        let data_start = dir_start
            .checked_add(sb.dir_blocks)
            .ok_or(MountError::BadGeometry)?;

        if data_start > sb.blocks || sb.blocks.checked_mul(sb.bytes_per_block).is_none() {
            return Err(MountError::BadGeometry);
        }

        Ok(Self {
            fat_start,
            fat_size,
            dir_start,
            dir_size: sb.dir_blocks,
            data_start,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_regions() {
        let sb = Superblock {
            blocks: 100,
            dir_blocks: 1,
            bytes_per_block: 4096,
        };
        let layout = Layout::derive(&sb).unwrap();

        assert_eq!(1, layout.fat_size);
        assert_eq!(16, layout.fat_start);
        assert_eq!(17, layout.dir_start);
        assert_eq!(18, layout.data_start);
    }

    #[test]
    fn reject_bad_geometry() {
        let mut sb = Superblock {
            blocks: 100,
            dir_blocks: 1,
            bytes_per_block: 0,
        };
        assert_eq!(Err(MountError::UnsupportedBlockSize), Layout::derive(&sb));

        sb.bytes_per_block = 1000;
        assert_eq!(Err(MountError::UnsupportedBlockSize), Layout::derive(&sb));
    }

    #[test]
    fn reject_wrapping_geometry() {
        // 总块数大到链表字节量回绕
        let mut sb = Superblock {
            blocks: u64::MAX,
            dir_blocks: 1,
            bytes_per_block: 512,
        };
        assert_eq!(Err(MountError::BadGeometry), Layout::derive(&sb));

        // 区域超出卷界：16 + 1 + 10 > 20
        sb.blocks = 20;
        sb.dir_blocks = 10;
        assert_eq!(Err(MountError::BadGeometry), Layout::derive(&sb));

        // 区域本身放得下，但卷的字节总量超出u64
        sb.blocks = 1 << 40;
        sb.dir_blocks = 1;
        sb.bytes_per_block = 1 << 30;
        assert_eq!(Err(MountError::BadGeometry), Layout::derive(&sb));
    }

    #[test]
    fn decode_checks_signature() {
        let mut raw = [0u8; SUPERBLOCK_SIZE];
        assert_eq!(
            Err(MountError::SignatureMismatch),
            Superblock::decode(&raw)
        );

        let sb = Superblock {
            blocks: 42,
            dir_blocks: 2,
            bytes_per_block: 512,
        };
        sb.encode(&mut raw);
        assert_eq!(Ok(sb), Superblock::decode(&raw));
    }
}
