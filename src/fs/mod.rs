//! The file system layer: interprets block 0 as the superblock, blocks
//! `1..InodeBlocks` as the inode table, and the remainder as data. Owns the
//! transient free-block bitmap and mediates every file operation.

pub mod bitmap;
pub mod inode;
pub mod superblock;

use std::fmt;

use crate::disk::{BLOCK_SIZE, BlockDevice, DiskError};
use bitmap::Bitmap;
use inode::{IndirectBlock, Inode, InodeBlock};
use superblock::{
    INODES_PER_BLOCK, MAGIC_NUMBER, MAX_FILE_SIZE, POINTERS_PER_BLOCK, POINTERS_PER_INODE,
    Superblock,
};

/// Errors a mounted volume can report back to its caller. Unlike
/// [`DiskError`], these describe a malformed request rather than a failed
/// I/O — the volume stays usable afterwards.
#[derive(Debug)]
pub enum FsError {
    /// `format`/`mount` was attempted on a device that is already mounted.
    AlreadyMounted,
    /// The superblock read at mount time failed validation.
    InvalidSuperblock,
    /// The requested inumber is outside `0..inodes`.
    InvalidInumber,
    /// The inode at the requested inumber is not valid (allocated).
    InvalidInode,
    /// A read or write was attempted at an offset past the file's size.
    OffsetPastEnd,
    /// The underlying block device reported a fatal I/O error.
    Disk(DiskError),
}

impl fmt::Display for FsError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyMounted => write!(fmt, "device is already mounted"),
            Self::InvalidSuperblock => write!(fmt, "superblock failed validation"),
            Self::InvalidInumber => write!(fmt, "inumber is out of range"),
            Self::InvalidInode => write!(fmt, "inode is not valid"),
            Self::OffsetPastEnd => write!(fmt, "offset is past the end of the file"),
            Self::Disk(e) => write!(fmt, "{e}"),
        }
    }
}

impl std::error::Error for FsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Disk(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DiskError> for FsError {
    fn from(e: DiskError) -> Self {
        Self::Disk(e)
    }
}

/// A mounted volume: the device it owns, cached superblock fields, and the
/// in-memory free-block bitmap reconstructed at mount time.
pub struct FileSystem {
    device: BlockDevice,
    blocks: u32,
    inode_blocks: u32,
    inodes: u32,
    bitmap: Bitmap,
}

impl FileSystem {
    /// Writes a fresh superblock and zeroes every other block. Refuses if
    /// `device` is already mounted. Does not mount the device.
    pub fn format(device: &mut BlockDevice) -> Result<(), FsError> {
        if device.mounted() {
            return Err(FsError::AlreadyMounted);
        }
        let sb = Superblock::for_blocks(device.size());
        let mut block0 = [0u8; BLOCK_SIZE];
        sb.encode(&mut block0);
        device.write(0, &block0)?;

        let zero = [0u8; BLOCK_SIZE];
        for i in 1..sb.blocks {
            device.write(i, &zero)?;
        }
        Ok(())
    }

    /// Validates the superblock and reconstructs the free-block bitmap.
    /// On failure, returns the device back to the caller untouched.
    pub fn mount(mut device: BlockDevice) -> Result<Self, (BlockDevice, FsError)> {
        if device.mounted() {
            return Err((device, FsError::AlreadyMounted));
        }

        let mut block0 = [0u8; BLOCK_SIZE];
        if let Err(e) = device.read(0, &mut block0) {
            return Err((device, FsError::Disk(e)));
        }
        let sb = Superblock::decode(&block0);
        if !sb.is_valid() || sb.blocks != device.size() {
            return Err((device, FsError::InvalidSuperblock));
        }

        let mut bitmap = Bitmap::new(sb.blocks);
        for b in 0..=sb.inode_blocks {
            bitmap.mark_used(b);
        }
        for i in 0..sb.inode_blocks {
            let mut block = [0u8; BLOCK_SIZE];
            if let Err(e) = device.read(1 + i, &mut block) {
                return Err((device, FsError::Disk(e)));
            }
            let inode_block = InodeBlock::decode(&block);
            for inode in inode_block.0.iter() {
                if !inode.valid {
                    continue;
                }
                for &d in inode.direct.iter() {
                    if d != 0 {
                        bitmap.mark_used(d);
                    }
                }
                if inode.indirect != 0 {
                    bitmap.mark_used(inode.indirect);
                    let mut ind_raw = [0u8; BLOCK_SIZE];
                    if let Err(e) = device.read(inode.indirect, &mut ind_raw) {
                        return Err((device, FsError::Disk(e)));
                    }
                    let indirect = IndirectBlock::decode(&ind_raw);
                    for &p in indirect.0.iter() {
                        if p != 0 {
                            bitmap.mark_used(p);
                        }
                    }
                }
            }
        }

        device.mount();
        Ok(Self {
            device,
            blocks: sb.blocks,
            inode_blocks: sb.inode_blocks,
            inodes: sb.inodes,
            bitmap,
        })
    }

    /// Reads the superblock and prints its fields and the attributes of
    /// every valid inode. Never mutates the device and does not require it
    /// to be mounted.
    pub fn debug(device: &mut BlockDevice) -> Result<(), FsError> {
        let mut block0 = [0u8; BLOCK_SIZE];
        device.read(0, &mut block0)?;
        let sb = Superblock::decode(&block0);

        println!("SuperBlock:");
        println!(
            "    magic number is {}",
            if sb.magic_number == MAGIC_NUMBER { "valid" } else { "invalid" }
        );
        println!("    Blocks={} InodeBlocks={} Inodes={}", sb.blocks, sb.inode_blocks, sb.inodes);
        println!("Inodes:");

        for i in 0..sb.inode_blocks {
            let mut block = [0u8; BLOCK_SIZE];
            device.read(1 + i, &mut block)?;
            let inode_block = InodeBlock::decode(&block);
            for (slot, inode) in inode_block.0.iter().enumerate() {
                if !inode.valid {
                    continue;
                }
                let inumber = i * INODES_PER_BLOCK as u32 + slot as u32;
                let direct: Vec<u32> = inode.direct.iter().copied().filter(|&d| d != 0).collect();
                print!("    inode {inumber}: size {} bytes, direct blocks [", inode.size);
                for (k, d) in direct.iter().enumerate() {
                    if k > 0 {
                        print!(" ");
                    }
                    print!("{d}");
                }
                print!("]");
                if inode.indirect != 0 {
                    let mut ind_raw = [0u8; BLOCK_SIZE];
                    device.read(inode.indirect, &mut ind_raw)?;
                    let indirect = IndirectBlock::decode(&ind_raw);
                    let pointers: Vec<u32> =
                        indirect.0.iter().copied().filter(|&p| p != 0).collect();
                    print!(", indirect block {}, pointers [", inode.indirect);
                    for (k, p) in pointers.iter().enumerate() {
                        if k > 0 {
                            print!(" ");
                        }
                        print!("{p}");
                    }
                    print!("]");
                }
                println!();
            }
        }
        Ok(())
    }

    fn locate(&self, inumber: u32) -> Result<(u32, usize), FsError> {
        if inumber >= self.inodes {
            return Err(FsError::InvalidInumber);
        }
        let block_idx = 1 + inumber / INODES_PER_BLOCK as u32;
        let slot = (inumber % INODES_PER_BLOCK as u32) as usize;
        Ok((block_idx, slot))
    }

    fn read_inode_block(&mut self, block_idx: u32) -> Result<InodeBlock, FsError> {
        let mut raw = [0u8; BLOCK_SIZE];
        self.device.read(block_idx, &mut raw)?;
        Ok(InodeBlock::decode(&raw))
    }

    fn write_inode_block(&mut self, block_idx: u32, ib: &InodeBlock) -> Result<(), FsError> {
        let mut raw = [0u8; BLOCK_SIZE];
        ib.encode(&mut raw);
        self.device.write(block_idx, &raw)?;
        Ok(())
    }

    fn load_inode(&mut self, inumber: u32) -> Result<(u32, usize, Inode), FsError> {
        let (block_idx, slot) = self.locate(inumber)?;
        let ib = self.read_inode_block(block_idx)?;
        Ok((block_idx, slot, ib.0[slot]))
    }

    fn zero_block(&mut self, block: u32) -> Result<(), FsError> {
        let zero = [0u8; BLOCK_SIZE];
        self.device.write(block, &zero)?;
        Ok(())
    }

    /// Scans the inode table in ascending order for the first invalid
    /// (unallocated) inode, clears it, and returns its inumber. `Ok(None)`
    /// if every inode is already valid.
    pub fn create(&mut self) -> Result<Option<u32>, FsError> {
        for i in 0..self.inode_blocks {
            let block_idx = 1 + i;
            let mut inode_block = self.read_inode_block(block_idx)?;
            if let Some(slot) = inode_block.0.iter().position(|inode| !inode.valid) {
                inode_block.0[slot] = Inode {
                    valid: true,
                    size: 0,
                    direct: [0; POINTERS_PER_INODE],
                    indirect: 0,
                };
                self.write_inode_block(block_idx, &inode_block)?;
                return Ok(Some(i * INODES_PER_BLOCK as u32 + slot as u32));
            }
        }
        Ok(None)
    }

    /// Releases every block owned by `inumber` and invalidates it. The
    /// indirect block's pointed-to data blocks are freed *before* the
    /// indirect pointer itself is cleared — reversing that order would
    /// leak the blocks it pointed to.
    pub fn remove(&mut self, inumber: u32) -> Result<(), FsError> {
        let (block_idx, slot) = self.locate(inumber)?;
        let mut inode_block = self.read_inode_block(block_idx)?;
        let inode = &mut inode_block.0[slot];
        if !inode.valid {
            return Err(FsError::InvalidInode);
        }

        for d in inode.direct.iter_mut() {
            if *d != 0 {
                self.bitmap.mark_free(*d);
                *d = 0;
            }
        }
        if inode.indirect != 0 {
            let mut raw = [0u8; BLOCK_SIZE];
            self.device.read(inode.indirect, &mut raw)?;
            let indirect = IndirectBlock::decode(&raw);
            for &p in indirect.0.iter() {
                if p != 0 {
                    self.bitmap.mark_free(p);
                }
            }
            self.bitmap.mark_free(inode.indirect);
            inode.indirect = 0;
        }
        inode.valid = false;
        inode.size = 0;

        self.write_inode_block(block_idx, &inode_block)?;
        Ok(())
    }

    /// Returns the logical size of a valid inode.
    pub fn stat(&mut self, inumber: u32) -> Result<u32, FsError> {
        let (_, _, inode) = self.load_inode(inumber)?;
        if !inode.valid {
            return Err(FsError::InvalidInode);
        }
        Ok(inode.size)
    }

    /// Copies up to `buf.len()` bytes starting at `offset` into `buf`,
    /// clamped to the file's size. Returns the number of bytes copied.
    pub fn read(&mut self, inumber: u32, buf: &mut [u8], offset: u64) -> Result<usize, FsError> {
        let (_, _, inode) = self.load_inode(inumber)?;
        if !inode.valid {
            return Err(FsError::InvalidInode);
        }
        let size = inode.size as u64;
        if offset > size {
            return Err(FsError::OffsetPastEnd);
        }
        if offset == size {
            return Ok(0);
        }

        let block_size = BLOCK_SIZE as u64;
        let length = (buf.len() as u64).min(size - offset);
        if length == 0 {
            return Ok(0);
        }
        let end_offset = offset + length;
        let start_block = offset / block_size;
        let end_block = if end_offset % block_size == 0 {
            end_offset / block_size - 1
        } else {
            end_offset / block_size
        };

        let mut indirect: Option<IndirectBlock> = None;
        if end_block >= POINTERS_PER_INODE as u64 && inode.indirect != 0 {
            let mut raw = [0u8; BLOCK_SIZE];
            self.device.read(inode.indirect, &mut raw)?;
            indirect = Some(IndirectBlock::decode(&raw));
        }

        let mut copied: usize = 0;
        let mut block_index = start_block;
        while block_index <= end_block && (copied as u64) < length {
            let data_block = if block_index < POINTERS_PER_INODE as u64 {
                inode.direct[block_index as usize]
            } else {
                indirect
                    .as_ref()
                    .map(|ib| ib.0[(block_index - POINTERS_PER_INODE as u64) as usize])
                    .unwrap_or(0)
            };

            let start = if block_index == start_block { (offset % block_size) as usize } else { 0 };
            let end = if block_index == end_block {
                let r = (end_offset % block_size) as usize;
                if r == 0 { BLOCK_SIZE } else { r }
            } else {
                BLOCK_SIZE
            };
            let want = end - start;

            if data_block == 0 {
                buf[copied..copied + want].fill(0);
            } else {
                let mut data = [0u8; BLOCK_SIZE];
                self.device.read(data_block, &mut data)?;
                buf[copied..copied + want].copy_from_slice(&data[start..end]);
            }
            copied += want;
            block_index += 1;
        }
        Ok(copied)
    }

    /// Writes `buf` at `offset`, allocating direct and indirect blocks on
    /// demand. Returns the number of bytes actually persisted, which may
    /// be less than `buf.len()` if the volume runs out of free blocks or
    /// the file would exceed [`MAX_FILE_SIZE`] — any partial progress is
    /// still committed before returning.
    pub fn write(&mut self, inumber: u32, buf: &[u8], offset: u64) -> Result<usize, FsError> {
        let (block_idx, slot) = self.locate(inumber)?;
        let mut inode_block = self.read_inode_block(block_idx)?;
        let mut inode = inode_block.0[slot];
        if !inode.valid {
            return Err(FsError::InvalidInode);
        }
        if offset > inode.size as u64 {
            return Err(FsError::OffsetPastEnd);
        }

        let length = if offset >= MAX_FILE_SIZE {
            0
        } else {
            (buf.len() as u64).min(MAX_FILE_SIZE - offset)
        };

        let block_size = BLOCK_SIZE as u64;
        let last_block = POINTERS_PER_INODE as u64 + POINTERS_PER_BLOCK as u64 - 1;

        let mut bytes_written: u64 = 0;
        let mut block = offset / block_size;
        let mut inode_dirty = false;
        let mut indirect_image: Option<IndirectBlock> = None;
        let mut indirect_dirty = false;

        while bytes_written < length && block <= last_block {
            let data_block = if block < POINTERS_PER_INODE as u64 {
                let idx = block as usize;
                if inode.direct[idx] == 0 {
                    match self.bitmap.allocate() {
                        Some(b) => {
                            self.zero_block(b)?;
                            inode.direct[idx] = b;
                            inode_dirty = true;
                            b
                        }
                        None => break,
                    }
                } else {
                    inode.direct[idx]
                }
            } else {
                if inode.indirect == 0 {
                    match self.bitmap.allocate() {
                        Some(b) => {
                            self.zero_block(b)?;
                            inode.indirect = b;
                            inode_dirty = true;
                        }
                        None => break,
                    }
                }
                if indirect_image.is_none() {
                    let mut raw = [0u8; BLOCK_SIZE];
                    self.device.read(inode.indirect, &mut raw)?;
                    indirect_image = Some(IndirectBlock::decode(&raw));
                }
                let ptr_idx = (block - POINTERS_PER_INODE as u64) as usize;
                let image = indirect_image.as_mut().unwrap();
                if image.0[ptr_idx] == 0 {
                    match self.bitmap.allocate() {
                        Some(b) => {
                            self.zero_block(b)?;
                            image.0[ptr_idx] = b;
                            indirect_dirty = true;
                            b
                        }
                        None => break,
                    }
                } else {
                    image.0[ptr_idx]
                }
            };

            let (write_offset, write_length) = if bytes_written == 0 {
                let wo = (offset % block_size) as usize;
                let wl = (BLOCK_SIZE - wo).min((length - bytes_written) as usize);
                (wo, wl)
            } else {
                let wl = BLOCK_SIZE.min((length - bytes_written) as usize);
                (0, wl)
            };

            let mut block_buf = [0u8; BLOCK_SIZE];
            if write_length < BLOCK_SIZE {
                self.device.read(data_block, &mut block_buf)?;
            }
            let src_start = bytes_written as usize;
            block_buf[write_offset..write_offset + write_length]
                .copy_from_slice(&buf[src_start..src_start + write_length]);
            self.device.write(data_block, &block_buf)?;

            bytes_written += write_length as u64;
            block += 1;
        }

        inode.size = inode.size.max((offset + bytes_written) as u32);
        inode_block.0[slot] = inode;
        if inode_dirty || bytes_written > 0 {
            self.write_inode_block(block_idx, &inode_block)?;
        }
        if indirect_dirty {
            if let Some(image) = indirect_image {
                let mut raw = [0u8; BLOCK_SIZE];
                image.encode(&mut raw);
                self.device.write(inode.indirect, &raw)?;
            }
        }

        Ok(bytes_written as usize)
    }

    /// The total number of blocks on the mounted volume.
    pub fn blocks(&self) -> u32 {
        self.blocks
    }

    /// The number of inode blocks on the mounted volume.
    pub fn inode_blocks(&self) -> u32 {
        self.inode_blocks
    }

    /// The total number of inodes the volume can hold.
    pub fn inodes(&self) -> u32 {
        self.inodes
    }

    /// The number of blocks currently free, per the in-memory bitmap.
    pub fn free_blocks(&self) -> usize {
        self.bitmap.free_count()
    }

    /// Unmounts the volume and hands the underlying device back.
    pub fn unmount(mut self) -> BlockDevice {
        self.device.unmount();
        self.device
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::temp_dir;

    fn temp_path(name: &str) -> std::path::PathBuf {
        let mut p = temp_dir();
        p.push(format!("sfs-fs-test-{name}-{}", std::process::id()));
        p
    }

    fn formatted(name: &str, nblocks: u32) -> FileSystem {
        let path = temp_path(name);
        let _ = std::fs::remove_file(&path);
        let mut device = BlockDevice::create(&path, nblocks).unwrap();
        FileSystem::format(&mut device).unwrap();
        FileSystem::mount(device).unwrap_or_else(|(_, e)| panic!("mount failed: {e}"))
    }

    // A freshly formatted 20-block disk yields 2 inode blocks, 256 inodes.
    #[test]
    fn format_then_mount() {
        let fs = formatted("s1", 20);
        assert_eq!(fs.blocks(), 20);
        assert_eq!(fs.inode_blocks(), 2);
        assert_eq!(fs.inodes(), 256);
    }

    // A small write round-trips and stat reports its length.
    #[test]
    fn small_write_round_trip() {
        let mut fs = formatted("s2", 20);
        let inumber = fs.create().unwrap().unwrap();
        assert_eq!(inumber, 0);
        let written = fs.write(inumber, b"helloworld", 0).unwrap();
        assert_eq!(written, 10);
        assert_eq!(fs.stat(inumber).unwrap(), 10);
        let mut buf = [0u8; 10];
        let read = fs.read(inumber, &mut buf, 0).unwrap();
        assert_eq!(read, 10);
        assert_eq!(&buf, b"helloworld");
    }

    // A write spanning a block boundary spans Direct[0] and Direct[1].
    #[test]
    fn cross_boundary_write() {
        let mut fs = formatted("s3", 20);
        let before_free = fs.free_blocks();
        let inumber = fs.create().unwrap().unwrap();
        let pattern: Vec<u8> = (0..5000u32).map(|i| (i % 251) as u8).collect();
        let written = fs.write(inumber, &pattern, 0).unwrap();
        assert_eq!(written, 5000);
        assert_eq!(fs.stat(inumber).unwrap(), 5000);

        let mut buf = vec![0u8; 5000];
        let read = fs.read(inumber, &mut buf, 0).unwrap();
        assert_eq!(read, 5000);
        assert_eq!(buf, pattern);

        // Exactly two more blocks are in use than right after format+create.
        assert_eq!(before_free - fs.free_blocks(), 2);
    }

    // A write past 5 direct blocks allocates the indirect block and one pointer.
    #[test]
    fn write_into_indirect() {
        let mut fs = formatted("s4", 2048);
        let before_free = fs.free_blocks();
        let inumber = fs.create().unwrap().unwrap();
        let pattern: Vec<u8> = (0..21000u32).map(|i| (i % 251) as u8).collect();
        let written = fs.write(inumber, &pattern, 0).unwrap();
        assert_eq!(written, 21000);
        assert_eq!(fs.stat(inumber).unwrap(), 21000);

        let mut buf = vec![0u8; 21000];
        let read = fs.read(inumber, &mut buf, 0).unwrap();
        assert_eq!(read, 21000);
        assert_eq!(buf, pattern);

        // 5 direct data blocks + 1 indirect block + 1 indirect-referenced data block.
        assert_eq!(before_free - fs.free_blocks(), 7);
    }

    // Remove releases every block; a later create reuses the inumber.
    #[test]
    fn remove_releases_blocks() {
        let mut fs = formatted("s5", 2048);
        let before_free = fs.free_blocks();
        let inumber = fs.create().unwrap().unwrap();
        let pattern: Vec<u8> = (0..21000u32).map(|i| (i % 251) as u8).collect();
        fs.write(inumber, &pattern, 0).unwrap();

        fs.remove(inumber).unwrap();
        assert!(fs.stat(inumber).is_err());
        assert_eq!(fs.free_blocks(), before_free);

        let again = fs.create().unwrap().unwrap();
        assert_eq!(again, inumber);
        assert_eq!(fs.write(again, b"ok", 0).unwrap(), 2);
    }

    // A disk with only 3 free data blocks left returns a short write.
    #[test]
    fn disk_full_short_write() {
        // 11 blocks: block 0 + 1 inode block (InodeBlocks = ceil(11/10) = 2)
        // leaves 11 - 1 - 2 = 8 data blocks; exhaust all but 3 first.
        let mut fs = formatted("s6", 11);
        let filler = fs.create().unwrap().unwrap();
        let zeros = vec![0u8; 4096 * 5];
        fs.write(filler, &zeros, 0).unwrap();
        assert_eq!(fs.free_blocks(), 3);

        let inumber = fs.create().unwrap().unwrap();
        let data = vec![0xABu8; 16384];
        let written = fs.write(inumber, &data, 0).unwrap();
        assert_eq!(written, 12288);
        assert_eq!(fs.stat(inumber).unwrap(), 12288);

        let further = fs.write(inumber, &data, 12288).unwrap();
        assert_eq!(further, 0);
    }

    #[test]
    fn write_clamps_to_max_file_size() {
        let mut fs = formatted("clamp", 2048);
        let inumber = fs.create().unwrap().unwrap();
        let huge = vec![0u8; (MAX_FILE_SIZE + 4096) as usize];
        let written = fs.write(inumber, &huge, 0).unwrap();
        assert_eq!(written as u64, MAX_FILE_SIZE);
        assert_eq!(fs.stat(inumber).unwrap() as u64, MAX_FILE_SIZE);
        // The file is already at MAX_FILE_SIZE; nothing more can be appended.
        assert_eq!(fs.write(inumber, b"x", MAX_FILE_SIZE).unwrap(), 0);
    }

    #[test]
    fn partial_overwrite_preserves_untouched_bytes() {
        let mut fs = formatted("partial", 20);
        let inumber = fs.create().unwrap().unwrap();
        fs.write(inumber, b"0123456789", 0).unwrap();
        fs.write(inumber, b"XY", 3).unwrap();
        let mut buf = [0u8; 10];
        fs.read(inumber, &mut buf, 0).unwrap();
        assert_eq!(&buf, b"012XY56789");
    }

    #[test]
    fn read_past_end_fails_and_at_end_is_empty() {
        let mut fs = formatted("readend", 20);
        let inumber = fs.create().unwrap().unwrap();
        fs.write(inumber, b"hello", 0).unwrap();
        let mut buf = [0u8; 4];
        assert!(fs.read(inumber, &mut buf, 6).is_err());
        let read = fs.read(inumber, &mut buf, 5).unwrap();
        assert_eq!(read, 0);
    }

    #[test]
    fn write_requires_offset_within_current_size() {
        let mut fs = formatted("append", 20);
        let inumber = fs.create().unwrap().unwrap();
        fs.write(inumber, b"abc", 0).unwrap();
        assert!(fs.write(inumber, b"def", 10).is_err());
        assert!(fs.write(inumber, b"def", 3).is_ok());
    }

    #[test]
    fn unmount_clears_mounted_flag() {
        let path = temp_path("unmount");
        let mut device = BlockDevice::create(&path, 20).unwrap();
        FileSystem::format(&mut device).unwrap();
        let fs = FileSystem::mount(device).unwrap();
        let device = fs.unmount();
        assert!(!device.mounted());
    }

    #[test]
    fn mount_refuses_already_mounted_device() {
        let path = temp_path("alreadymounted");
        let mut device = BlockDevice::create(&path, 20).unwrap();
        FileSystem::format(&mut device).unwrap();
        device.mount();
        match FileSystem::mount(device) {
            Err((_, FsError::AlreadyMounted)) => {}
            _ => panic!("expected AlreadyMounted"),
        }
    }

    #[test]
    fn format_refuses_already_mounted_device() {
        let path = temp_path("formatmounted");
        let mut device = BlockDevice::create(&path, 20).unwrap();
        device.mount();
        assert!(matches!(FileSystem::format(&mut device), Err(FsError::AlreadyMounted)));
    }

    #[test]
    fn mount_rejects_bad_magic() {
        let path = temp_path("badmagic");
        let device = BlockDevice::create(&path, 20).unwrap();
        // Never formatted: block 0 is all zero, magic number invalid.
        match FileSystem::mount(device) {
            Err((_, FsError::InvalidSuperblock)) => {}
            _ => panic!("expected InvalidSuperblock"),
        }
    }

    #[test]
    fn create_returns_none_when_inode_table_is_full() {
        let mut fs = formatted("fullinodes", 20);
        for _ in 0..fs.inodes() {
            fs.create().unwrap().unwrap();
        }
        assert_eq!(fs.create().unwrap(), None);
    }

    #[test]
    fn debug_on_freshly_formatted_disk() {
        let path = temp_path("debugempty");
        let _ = std::fs::remove_file(&path);
        let mut device = BlockDevice::create(&path, 20).unwrap();
        FileSystem::format(&mut device).unwrap();
        assert!(FileSystem::debug(&mut device).is_ok());
    }

    #[test]
    fn debug_on_populated_disk_with_direct_and_indirect_blocks() {
        let mut fs = formatted("debugpopulated", 2048);
        let inumber = fs.create().unwrap().unwrap();
        let pattern: Vec<u8> = (0..21000u32).map(|i| (i % 251) as u8).collect();
        fs.write(inumber, &pattern, 0).unwrap();
        let mut device = fs.unmount();
        assert!(FileSystem::debug(&mut device).is_ok());
    }
}
