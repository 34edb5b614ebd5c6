//! The block device underlying a file system: a flat array of fixed-size
//! blocks backed by a host file.

use std::fmt;
use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Read;
use std::io::Seek;
use std::io::SeekFrom;
use std::io::Write;
use std::path::Path;

/// The size, in bytes, of a single block. Fixed and part of the on-disk
/// format; changing it breaks compatibility with existing volumes.
pub const BLOCK_SIZE: usize = 4096;

/// Errors reported by [`BlockDevice`]. These are "fatal" in the sense the
/// specification describes: the device cannot make progress on a malformed
/// request, so the caller (not this module) decides whether to abort.
#[derive(Debug)]
pub enum DiskError {
    /// The underlying host file could not be read from or written to.
    Io(io::Error),
    /// The requested block index is outside `0..blocks`.
    OutOfRange {
        /// The block index that was requested.
        blocknum: u32,
        /// The total number of blocks on the device.
        blocks: u32,
    },
}

impl fmt::Display for DiskError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(fmt, "I/O error: {e}"),
            Self::OutOfRange { blocknum, blocks } => {
                write!(fmt, "block {blocknum} is out of range (device has {blocks} blocks)")
            }
        }
    }
}

impl std::error::Error for DiskError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::OutOfRange { .. } => None,
        }
    }
}

impl From<io::Error> for DiskError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

/// A flat, block-addressed view over a host file.
///
/// Tracks an in-use ("mounted") counter and per-call read/write counters,
/// but implies no locking: the design assumes a single caller (see the
/// concurrency notes in the file system's documentation).
pub struct BlockDevice {
    file: File,
    blocks: u32,
    mounts: u32,
    reads: u64,
    writes: u64,
}

impl BlockDevice {
    /// Creates (or truncates) the host file at `path` to hold exactly
    /// `nblocks` blocks and opens it for random-access reads and writes.
    pub fn create(path: impl AsRef<Path>, nblocks: u32) -> io::Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        file.set_len(nblocks as u64 * BLOCK_SIZE as u64)?;
        Ok(Self {
            file,
            blocks: nblocks,
            mounts: 0,
            reads: 0,
            writes: 0,
        })
    }

    /// Opens an existing host file, deriving the block count from its
    /// length. Fails if the file's length is not a whole number of blocks.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        let len = file.metadata()?.len();
        if len % BLOCK_SIZE as u64 != 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "host file length is not a multiple of the block size",
            ));
        }
        Ok(Self {
            file,
            blocks: (len / BLOCK_SIZE as u64) as u32,
            mounts: 0,
            reads: 0,
            writes: 0,
        })
    }

    fn check_range(&self, blocknum: u32) -> Result<(), DiskError> {
        if blocknum >= self.blocks {
            return Err(DiskError::OutOfRange {
                blocknum,
                blocks: self.blocks,
            });
        }
        Ok(())
    }

    /// Reads exactly one block into `buf`. A short read is impossible to
    /// observe here: [`Read::read_exact`] turns it into an I/O error.
    pub fn read(&mut self, blocknum: u32, buf: &mut [u8; BLOCK_SIZE]) -> Result<(), DiskError> {
        self.check_range(blocknum)?;
        self.file.seek(SeekFrom::Start(blocknum as u64 * BLOCK_SIZE as u64))?;
        self.file.read_exact(buf)?;
        self.reads += 1;
        Ok(())
    }

    /// Writes exactly one block from `buf`. A short write is a failure,
    /// not a partial success: [`Write::write_all`] guarantees this.
    pub fn write(&mut self, blocknum: u32, buf: &[u8; BLOCK_SIZE]) -> Result<(), DiskError> {
        self.check_range(blocknum)?;
        self.file.seek(SeekFrom::Start(blocknum as u64 * BLOCK_SIZE as u64))?;
        self.file.write_all(buf)?;
        self.writes += 1;
        Ok(())
    }

    /// Returns the total number of blocks on the device.
    pub fn size(&self) -> u32 {
        self.blocks
    }

    /// Tags the device as mounted. Not a lock: it only prevents double
    /// formatting, since no concurrency across callers is implied.
    pub fn mount(&mut self) {
        self.mounts += 1;
    }

    /// Reverses one `mount()` call.
    pub fn unmount(&mut self) {
        if self.mounts > 0 {
            self.mounts -= 1;
        }
    }

    /// Whether the device is currently tagged as mounted.
    pub fn mounted(&self) -> bool {
        self.mounts > 0
    }

    /// The number of successful `read()` calls so far.
    pub fn reads(&self) -> u64 {
        self.reads
    }

    /// The number of successful `write()` calls so far.
    pub fn writes(&self) -> u64 {
        self.writes
    }
}

impl Drop for BlockDevice {
    fn drop(&mut self) {
        println!("{} disk block reads", self.reads);
        println!("{} disk block writes", self.writes);
    }
}
