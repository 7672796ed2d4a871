use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod read;
pub mod send;
pub mod serve;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve a message slot on a socket path.
    Serve(ServeArgs),
    /// Write one message to a channel and exit.
    Send(SendArgs),
    /// Print the pending message on a channel and exit.
    Read(ReadArgs),
}

pub fn run(command: Command) -> CliResult<i32> {
    match command {
        Command::Serve(args) => serve::run(args),
        Command::Send(args) => send::run(args),
        Command::Read(args) => read::run(args),
    }
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Socket path to bind.
    pub path: PathBuf,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Socket path of the served slot.
    pub path: PathBuf,
    /// Channel id (non-zero).
    pub channel: u32,
    /// Message to store.
    #[arg(required_unless_present = "file")]
    pub message: Option<String>,
    /// Read the message from a file instead.
    #[arg(long, conflicts_with = "message")]
    pub file: Option<PathBuf>,
    /// Device instance to open.
    #[arg(long, short = 'i', default_value_t = 0)]
    pub instance: u8,
}

#[derive(Args, Debug)]
pub struct ReadArgs {
    /// Socket path of the served slot.
    pub path: PathBuf,
    /// Channel id (non-zero).
    pub channel: u32,
    /// Device instance to open.
    #[arg(long, short = 'i', default_value_t = 0)]
    pub instance: u8,
    /// Reader capacity in bytes.
    #[arg(long, default_value_t = msgslot_core::MAX_MESSAGE_LEN as u32)]
    pub capacity: u32,
    /// Output format.
    #[arg(long, value_enum, default_value = "raw")]
    pub format: OutputFormat,
}
