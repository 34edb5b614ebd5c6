//! The `remove` subcommand: releases every block owned by an inode and
//! invalidates it.

use std::env::Args;

use sfs::{BlockDevice, FileSystem};

use crate::die;

fn print_usage() {
    eprintln!("Usage: sfs remove <path> <inumber>");
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
    let inumber: u32 = inumber
        .parse()
        .unwrap_or_else(|_| die(format!("`{inumber}` is not a valid inumber")));

    let device = BlockDevice::open(&path).unwrap_or_else(|e| die(format!("{path}: {e}")));
    let mut fs = FileSystem::mount(device).unwrap_or_else(|(_, e)| die(e));
    fs.remove(inumber).unwrap_or_else(|e| die(e));
}
