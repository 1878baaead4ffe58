use crate::{DELETED_ENTRY, RESERVED_SLOT, ROOT_ID};

/// 名字的字节容量，较短的名字以0填充
pub const FILENAME_LEN: usize = 218;

/// 一条目录记录的字节量
pub const ENTRY_SIZE: usize = 256;

const PARENT_OFFSET: usize = 0;
const KIND_OFFSET: usize = 8;
const NAME_OFFSET: usize = 9;
const PERMS_OFFSET: usize = 227;
const OWNER_OFFSET: usize = 228;
const GROUP_OFFSET: usize = 230;
const TIME_OFFSET: usize = 232;
const PAYLOAD_OFFSET: usize = 240;
const SIZE_OFFSET: usize = 248;

/// 目录表中的一条记录，文件与目录共用此结构。
///
/// `parent_id == 0` 表示有效记录到此为止，扫描即可终止；
/// `payload` 对文件是首个数据块的块号，对目录是它自己的目录号。
/// 权限、属主、时间戳等元数据驱动只保存不解读。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub parent_id: u64,
    pub kind: EntryKind,
    name: [u8; FILENAME_LEN],
    pub perms: u8,
    pub owner: u16,
    pub group: u16,
    pub time: u64,
    pub payload: u64,
    pub size: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EntryKind {
    File = 0,
    Directory = 1,
}

impl Entry {
    pub fn new(parent_id: u64, kind: EntryKind, name: &str, payload: u64, size: u64) -> Self {
        debug_assert!(name.len() <= FILENAME_LEN);

        let mut buf = [0u8; FILENAME_LEN];
        buf[..name.len()].copy_from_slice(name.as_bytes());

        Self {
            parent_id,
            kind,
            name: buf,
            perms: 0,
            owner: 0,
            group: 0,
            time: 0,
            payload,
            size,
        }
    }

    /// 根目录的代用记录：目录表中并无此条，目录号恒为[`ROOT_ID`]。
    pub(crate) fn root() -> Self {
        Self::new(0, EntryKind::Directory, "", ROOT_ID, 0)
    }

    pub fn decode(raw: &[u8; ENTRY_SIZE]) -> Self {
        let mut name = [0u8; FILENAME_LEN];
        name.copy_from_slice(&raw[NAME_OFFSET..NAME_OFFSET + FILENAME_LEN]);

        Self {
            parent_id: read_qword(raw, PARENT_OFFSET),
            kind: if raw[KIND_OFFSET] == EntryKind::Directory as u8 {
                EntryKind::Directory
            } else {
                EntryKind::File
            },
            name,
            perms: raw[PERMS_OFFSET],
            owner: u16::from_le_bytes([raw[OWNER_OFFSET], raw[OWNER_OFFSET + 1]]),
            group: u16::from_le_bytes([raw[GROUP_OFFSET], raw[GROUP_OFFSET + 1]]),
            time: read_qword(raw, TIME_OFFSET),
            payload: read_qword(raw, PAYLOAD_OFFSET),
            size: read_qword(raw, SIZE_OFFSET),
        }
    }

    pub fn encode(&self) -> [u8; ENTRY_SIZE] {
        let mut raw = [0u8; ENTRY_SIZE];
        raw[PARENT_OFFSET..PARENT_OFFSET + 8].copy_from_slice(&self.parent_id.to_le_bytes());
        raw[KIND_OFFSET] = self.kind as u8;
        raw[NAME_OFFSET..NAME_OFFSET + FILENAME_LEN].copy_from_slice(&self.name);
        raw[PERMS_OFFSET] = self.perms;
        raw[OWNER_OFFSET..OWNER_OFFSET + 2].copy_from_slice(&self.owner.to_le_bytes());
        raw[GROUP_OFFSET..GROUP_OFFSET + 2].copy_from_slice(&self.group.to_le_bytes());
        raw[TIME_OFFSET..TIME_OFFSET + 8].copy_from_slice(&self.time.to_le_bytes());
        raw[PAYLOAD_OFFSET..PAYLOAD_OFFSET + 8].copy_from_slice(&self.payload.to_le_bytes());
        raw[SIZE_OFFSET..SIZE_OFFSET + 8].copy_from_slice(&self.size.to_le_bytes());
        raw
    }

    /// 名字的有效字节，截断于首个0
    pub fn name(&self) -> &[u8] {
        let len = self
            .name
            .iter()
            .position(|&c| c == 0)
            .unwrap_or(FILENAME_LEN);
        &self.name[..len]
    }

    /// 是否为有效记录的终止哨兵
    #[inline]
    pub fn is_end(&self) -> bool {
        self.parent_id == 0
    }

    /// 已删除或保留的槽位，检索时跳过
    #[inline]
    pub fn is_unlinked(&self) -> bool {
        self.parent_id == DELETED_ENTRY || self.parent_id == RESERVED_SLOT
    }
}

#[inline]
fn read_qword(raw: &[u8], offset: usize) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&raw[offset..offset + 8]);
    u64::from_le_bytes(buf)
}
