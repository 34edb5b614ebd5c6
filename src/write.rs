//! The `write` subcommand: writes literal argument bytes into an inode at
//! `offset`, allocating direct and indirect blocks on demand.

use std::env::Args;

use sfs::{BlockDevice, FileSystem};

use crate::die;

fn print_usage() {
    eprintln!("Usage: sfs write <path> <inumber> <offset> <data>");
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
    let Some(offset) = args.next() else {
        print_usage();
        std::process::exit(1);
    };
    let Some(data) = args.next() else {
        print_usage();
        std::process::exit(1);
    };
    let inumber: u32 = inumber
        .parse()
        .unwrap_or_else(|_| die(format!("`{inumber}` is not a valid inumber")));
    let offset: u64 = offset
        .parse()
        .unwrap_or_else(|_| die(format!("`{offset}` is not a valid offset")));

    let device = BlockDevice::open(&path).unwrap_or_else(|e| die(format!("{path}: {e}")));
    let mut fs = FileSystem::mount(device).unwrap_or_else(|(_, e)| die(e));
    let written = fs.write(inumber, data.as_bytes(), offset).unwrap_or_else(|e| die(e));
    println!("{written}");
}
