use enumflags2::bitflags;

/// 打开文件的标志位
#[bitflags]
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenFlag {
    /// 追加模式：打开时游标与下界都钉在文件末尾
    Append = 0b1,
}

/// [`lseek`]偏移量的基准
///
/// [`lseek`]: https://man7.org/linux/man-pages/man2/lseek.2.html
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Whence {
    Set,
    Cur,
    End,
}
