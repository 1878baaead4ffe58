mod block_file;
mod image;

pub use self::{block_file::BlockFile, image::ImageBuilder};
