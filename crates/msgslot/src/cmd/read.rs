use msgslot_host::SlotClient;

use crate::cmd::ReadArgs;
use crate::exit::{host_error, CliResult, SUCCESS};
use crate::output::print_message;

pub fn run(args: ReadArgs) -> CliResult<i32> {
    let mut client = SlotClient::connect(&args.path, args.instance)
        .map_err(|err| host_error("open failed", err))?;
    client
        .select_channel(args.channel)
        .map_err(|err| host_error("channel select failed", err))?;

    let message = client
        .read(args.capacity)
        .map_err(|err| host_error("read failed", err))?;

    print_message(args.instance, args.channel, &message, args.format);
    Ok(SUCCESS)
}
