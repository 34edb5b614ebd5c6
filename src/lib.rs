//! A simple UNIX-style file system implemented entirely over a fixed-size
//! block device: a superblock, a flat inode table with direct and single
//! indirect block pointers, and a free-block bitmap reconstructed at mount
//! time. No permissions, no directories, no concurrent access.

pub mod disk;
pub mod fs;

pub use disk::{BlockDevice, DiskError, BLOCK_SIZE};
pub use fs::{FileSystem, FsError};
