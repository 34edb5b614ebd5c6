//! The `debug` subcommand: prints the superblock and every valid inode.
//! Read-only and does not require the device to be mounted.

use std::env::Args;

use sfs::{BlockDevice, FileSystem};

use crate::die;

fn print_usage() {
    eprintln!("Usage: sfs debug <path>");
}

pub fn main(mut args: Args) {
    let Some(path) = args.next() else {
        print_usage();
        std::process::exit(1);
    };
    let mut device = BlockDevice::open(&path).unwrap_or_else(|e| die(format!("{path}: {e}")));
    FileSystem::debug(&mut device).unwrap_or_else(|e| die(e));
}
