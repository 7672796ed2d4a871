use std::fs;

use msgslot_host::SlotClient;

use crate::cmd::SendArgs;
use crate::exit::{host_error, io_error, CliError, CliResult, SUCCESS};

pub fn run(args: SendArgs) -> CliResult<i32> {
    let payload = resolve_payload(&args)?;

    let mut client = SlotClient::connect(&args.path, args.instance)
        .map_err(|err| host_error("open failed", err))?;
    client
        .select_channel(args.channel)
        .map_err(|err| host_error("channel select failed", err))?;

    let written = client
        .write(&payload)
        .map_err(|err| host_error("write failed", err))?;
    if written != payload.len() {
        return Err(CliError::new(format!(
            "short write: {written} of {} bytes",
            payload.len()
        )));
    }

    Ok(SUCCESS)
}

fn resolve_payload(args: &SendArgs) -> CliResult<Vec<u8>> {
    if let Some(path) = &args.file {
        return fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err));
    }
    match &args.message {
        Some(message) => Ok(message.clone().into_bytes()),
        None => Err(CliError::new("a message or --file is required")),
    }
}
