mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{LogFormat, LogLevel};

#[derive(Parser, Debug)]
#[command(name = "msgslot", version, about = "Multiplexed inter-process mailbox CLI")]
struct Cli {
    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.log_format, cli.log_level);

    match cmd::run(cli.command) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(exit::FAILURE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_send_subcommand() {
        let cli = Cli::try_parse_from(["msgslot", "send", "/tmp/slot.sock", "7", "hello"])
            .expect("send args should parse");
        assert!(matches!(cli.command, Command::Send(_)));
    }

    #[test]
    fn parses_read_with_instance() {
        let cli = Cli::try_parse_from([
            "msgslot",
            "read",
            "/tmp/slot.sock",
            "7",
            "--instance",
            "5",
        ])
        .expect("read args should parse");

        match cli.command {
            Command::Read(args) => {
                assert_eq!(args.channel, 7);
                assert_eq!(args.instance, 5);
            }
            other => panic!("expected read command, got {other:?}"),
        }
    }

    #[test]
    fn send_requires_message_or_file() {
        let err = Cli::try_parse_from(["msgslot", "send", "/tmp/slot.sock", "7"])
            .expect_err("missing payload should fail");
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn send_rejects_message_and_file_together() {
        let err = Cli::try_parse_from([
            "msgslot",
            "send",
            "/tmp/slot.sock",
            "7",
            "hello",
            "--file",
            "/tmp/payload",
        ])
        .expect_err("conflicting payload args should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }
}
