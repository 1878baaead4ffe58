use echfs::layout::{Entry, EntryKind, Layout, Superblock, ENTRY_SIZE, FILENAME_LEN};
use echfs::{MountError, END_OF_CHAIN, ROOT_ID};

/// Formats an echfs image in memory: 16 reserved blocks, the allocation
/// chain table, the flat directory table, then the data region.
///
/// The driver is read-only, so this builder is the only place ids and blocks
/// are ever allocated. Directory ids come from a monotonic counter, never
/// reusing a value within one image.
pub struct ImageBuilder {
    sb: Superblock,
    layout: Layout,
    chain: Vec<u64>,
    entries: Vec<Entry>,
    data: Vec<u8>,
    next_block: u64,
    next_dir_id: u64,
}

impl ImageBuilder {
    pub fn new(blocks: u64, bytes_per_block: u64, dir_blocks: u64) -> Result<Self, MountError> {
        let sb = Superblock {
            blocks,
            dir_blocks,
            bytes_per_block,
        };
        let layout = Layout::derive(&sb)?;
        assert!(layout.data_start <= blocks, "volume too small for metadata");

        Ok(Self {
            sb,
            layout,
            chain: vec![0; blocks as usize],
            entries: Vec::new(),
            data: vec![0; ((blocks - layout.data_start) * bytes_per_block) as usize],
            next_block: layout.data_start,
            next_dir_id: 1,
        })
    }

    /// Root directory id, the parent of all top-level entries.
    pub const ROOT: u64 = ROOT_ID;

    pub fn mkdir(&mut self, parent: u64, name: &str) -> u64 {
        assert!(name.len() <= FILENAME_LEN, "name too long");
        let id = self.next_dir_id;
        self.next_dir_id += 1;
        self.push_entry(Entry::new(parent, EntryKind::Directory, name, id, 0));
        id
    }

    pub fn add_file(&mut self, parent: u64, name: &str, contents: &[u8]) {
        assert!(name.len() <= FILENAME_LEN, "name too long");
        let bpb = self.sb.bytes_per_block as usize;
        let mut first = END_OF_CHAIN;
        let mut prev: Option<u64> = None;

        for piece in contents.chunks(bpb) {
            let block = self.alloc_block();
            let offset = ((block - self.layout.data_start) as usize) * bpb;
            self.data[offset..offset + piece.len()].copy_from_slice(piece);

            match prev {
                Some(prev) => self.chain[prev as usize] = block,
                None => first = block,
            }
            prev = Some(block);
        }
        if let Some(last) = prev {
            self.chain[last as usize] = END_OF_CHAIN;
        }

        self.push_entry(Entry::new(
            parent,
            EntryKind::File,
            name,
            first,
            contents.len() as u64,
        ));
    }

    pub fn build(self) -> Vec<u8> {
        let bpb = self.sb.bytes_per_block as usize;
        let mut image = vec![0u8; self.sb.blocks as usize * bpb];

        self.sb.encode(&mut image);

        let fat_offset = (self.layout.fat_start as usize) * bpb;
        for (i, next) in self.chain.iter().enumerate() {
            image[fat_offset + i * 8..fat_offset + (i + 1) * 8]
                .copy_from_slice(&next.to_le_bytes());
        }

        let dir_offset = (self.layout.dir_start as usize) * bpb;
        for (i, entry) in self.entries.iter().enumerate() {
            image[dir_offset + i * ENTRY_SIZE..dir_offset + (i + 1) * ENTRY_SIZE]
                .copy_from_slice(&entry.encode());
        }

        let data_offset = (self.layout.data_start as usize) * bpb;
        image[data_offset..].copy_from_slice(&self.data);

        image
    }

    fn alloc_block(&mut self) -> u64 {
        assert!(self.next_block < self.sb.blocks, "volume out of space");
        let block = self.next_block;
        self.next_block += 1;
        block
    }

    fn push_entry(&mut self, entry: Entry) {
        let capacity = self.layout.dir_size * (self.sb.bytes_per_block / ENTRY_SIZE as u64);
        assert!(
            (self.entries.len() as u64) < capacity,
            "directory table full"
        );
        self.entries.push(entry);
    }
}
