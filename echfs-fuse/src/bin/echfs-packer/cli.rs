use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
pub struct Cli {
    /// Directory tree to import
    #[arg(long, short)]
    pub source: PathBuf,

    /// Output image path
    #[arg(long, short = 'O')]
    pub out: PathBuf,

    /// Total blocks of the volume
    #[arg(long, default_value_t = 16384)]
    pub blocks: u64,

    /// Bytes per block (a multiple of the 512-byte sector)
    #[arg(long, default_value_t = 4096)]
    pub block_size: u64,

    /// Blocks reserved for the directory table
    #[arg(long, default_value_t = 16)]
    pub dir_blocks: u64,
}
