//! The `format` subcommand: lays down a fresh superblock and zeroes the
//! rest of the device.

use std::env::Args;

use sfs::{BlockDevice, FileSystem};

use crate::die;

fn print_usage() {
    eprintln!("Usage: sfs format <path> <nblocks>");
}

pub fn main(mut args: Args) {
    let Some(path) = args.next() else {
        print_usage();
        std::process::exit(1);
    };
    let Some(nblocks) = args.next() else {
        print_usage();
        std::process::exit(1);
    };
    let nblocks: u32 = nblocks
        .parse()
        .unwrap_or_else(|_| die(format!("`{nblocks}` is not a valid block count")));

    let mut device =
        BlockDevice::create(&path, nblocks).unwrap_or_else(|e| die(format!("{path}: {e}")));
    FileSystem::format(&mut device).unwrap_or_else(|e| die(e));
}
