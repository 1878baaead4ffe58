//! # 路径解析
//!
//! 逐分量地在目录表中线性检索绝对路径。
//! 中间分量必须是目录；末分量按调用者要求的类型检索。
//! 末分量缺失与中间分量缺失是两种必须可区分的结局：
//! 前者仍带回父目录的记录与末分量的名字，为将来的"打开即创建"留路。

use alloc::string::String;

use crate::layout::{Entry, EntryKind, FILENAME_LEN};
use crate::mount::Mount;
use crate::{PathError, DELETED_ENTRY, RESERVED_SLOT};

/// 一次解析的结局
#[derive(Debug)]
pub enum Resolution {
    /// 代用的根目录，目录表中没有对应记录
    Root,
    /// 目标记录及其在目录表中的下标
    Found {
        index: u64,
        entry: Entry,
        parent: Entry,
    },
    /// 仅末分量缺失，父目录信息照常带回
    NotFound { parent: Entry, name: String },
}

pub(crate) fn resolve(mnt: &Mount, path: &str, kind: EntryKind) -> Result<Resolution, PathError> {
    // 根目录是特例：作为目录恒成功，作为文件恒失败
    if path == "/" {
        return match kind {
            EntryKind::Directory => Ok(Resolution::Root),
            EntryKind::File => Err(PathError::ComponentNotFound),
        };
    }

    let path = path.strip_prefix('/').unwrap_or(path);
    let mut components = path.split('/');
    // split至少产出一个分量，unwrap不会触发
    let name = components.next_back().unwrap_or_default();

    let mut parent = Entry::root();
    for component in components {
        check_len(component)?;

        let Some((_, entry)) = search(mnt, parent.payload, EntryKind::Directory, component)
        else {
            // 同名文件存在与否决定报哪种错
            return if search(mnt, parent.payload, EntryKind::File, component).is_some() {
                Err(PathError::ComponentNotADirectory)
            } else {
                Err(PathError::ComponentNotFound)
            };
        };
        parent = entry;
    }

    check_len(name)?;
    match search(mnt, parent.payload, kind, name) {
        Some((index, entry)) => Ok(Resolution::Found {
            index,
            entry,
            parent,
        }),
        None => Ok(Resolution::NotFound {
            parent,
            name: String::from(name),
        }),
    }
}

/// 在目录表中检索`(parent, kind, name)`。
///
/// 按下标升序扫描，首个匹配者胜出（即创建顺序）；
/// 碰到终止哨兵或越过目录表容量即告失败。
fn search(mnt: &Mount, parent: u64, kind: EntryKind, name: &str) -> Option<(u64, Entry)> {
    for index in 0..mnt.dir_capacity() {
        let entry = mnt.read_entry(index);

        if entry.is_end() {
            return None;
        }
        if entry.is_unlinked() {
            continue;
        }

        if entry.parent_id == parent && entry.kind == kind && entry.name() == name.as_bytes() {
            // 目录号为删除/保留哨兵的记录绝不能当作活目录返回
            if kind == EntryKind::Directory
                && (entry.payload == DELETED_ENTRY || entry.payload == RESERVED_SLOT)
            {
                continue;
            }
            return Some((index, entry));
        }
    }

    None
}

#[inline]
fn check_len(component: &str) -> Result<(), PathError> {
    if component.len() > FILENAME_LEN {
        return Err(PathError::NameTooLong);
    }
    Ok(())
}
