//! The `read` subcommand: copies up to `length` bytes starting at `offset`
//! from an inode and prints them to stdout.

use std::env::Args;
use std::io::Write as _;

use sfs::{BlockDevice, FileSystem};

use crate::die;

fn print_usage() {
    eprintln!("Usage: sfs read <path> <inumber> <length> <offset>");
}

pub fn main(mut args: Args) {
    let Some(path) = args.next() else {
        print_usage();
        std::process::exit(1);
    };
    let Some(inumber) = args.next() else {
        print_usage();
        std::process::exit(1);
    };
    let Some(length) = args.next() else {
        print_usage();
        std::process::exit(1);
    };
    let Some(offset) = args.next() else {
        print_usage();
        std::process::exit(1);
    };
    let inumber: u32 = inumber
        .parse()
        .unwrap_or_else(|_| die(format!("`{inumber}` is not a valid inumber")));
    let length: usize = length
        .parse()
        .unwrap_or_else(|_| die(format!("`{length}` is not a valid length")));
    let offset: u64 = offset
        .parse()
        .unwrap_or_else(|_| die(format!("`{offset}` is not a valid offset")));

    let device = BlockDevice::open(&path).unwrap_or_else(|e| die(format!("{path}: {e}")));
    let mut fs = FileSystem::mount(device).unwrap_or_else(|(_, e)| die(e));

    let mut buf = vec![0u8; length];
    let n = fs.read(inumber, &mut buf, offset).unwrap_or_else(|e| die(e));
    std::io::stdout().write_all(&buf[..n]).unwrap_or_else(|e| die(e));
}
