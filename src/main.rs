//! Dispatches the `sfs` command-line tool's subcommands.

mod create;
mod debug;
mod format;
mod read;
mod remove;
mod stat;
mod write;

use std::env;
use std::fmt;
use std::process::exit;

/// Writes an error to stderr, then exits with status 1.
pub(crate) fn die<M: fmt::Display>(msg: M) -> ! {
    eprintln!("sfs: error: {msg}");
    exit(1);
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!(" sfs format <path> <nblocks>");
    eprintln!(" sfs debug <path>");
    eprintln!(" sfs create <path>");
    eprintln!(" sfs remove <path> <inumber>");
    eprintln!(" sfs stat <path> <inumber>");
    eprintln!(" sfs read <path> <inumber> <length> <offset>");
    eprintln!(" sfs write <path> <inumber> <offset> <data>");
}

fn main() {
    let mut args = env::args();
    args.next(); // skip argv[0]
    let Some(subcommand) = args.next() else {
        print_usage();
        exit(1);
    };
    match subcommand.as_str() {
        "format" => format::main(args),
        "debug" => debug::main(args),
        "create" => create::main(args),
        "remove" => remove::main(args),
        "stat" => stat::main(args),
        "read" => read::main(args),
        "write" => write::main(args),
        _ => {
            print_usage();
            exit(1);
        }
    }
}
