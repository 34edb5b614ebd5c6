//! The `create` subcommand: allocates the first free inode and prints its
//! inumber.

use std::env::Args;

use sfs::{BlockDevice, FileSystem};

use crate::die;

fn print_usage() {
    eprintln!("Usage: sfs create <path>");
}

pub fn main(mut args: Args) {
    let Some(path) = args.next() else {
        print_usage();
        std::process::exit(1);
    };
    let device = BlockDevice::open(&path).unwrap_or_else(|e| die(format!("{path}: {e}")));
    let mut fs = FileSystem::mount(device).unwrap_or_else(|(_, e)| die(e));
    match fs.create().unwrap_or_else(|e| die(e)) {
        Some(inumber) => println!("{inumber}"),
        None => die("no free inode"),
    }
}
