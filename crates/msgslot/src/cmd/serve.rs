use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use msgslot_host::SlotListener;
use tracing::warn;

use crate::cmd::ServeArgs;
use crate::exit::{host_error, CliError, CliResult, SUCCESS};

pub fn run(args: ServeArgs) -> CliResult<i32> {
    let listener =
        SlotListener::bind(&args.path).map_err(|err| host_error("bind failed", err))?;

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    while running.load(Ordering::SeqCst) {
        let driver = match listener.accept() {
            Ok(driver) => driver,
            Err(err) => {
                if !running.load(Ordering::SeqCst) {
                    break;
                }
                return Err(host_error("accept failed", err));
            }
        };

        thread::spawn(move || {
            if let Err(err) = driver.run() {
                warn!(error = %err, "session ended with error");
            }
        });
    }

    Ok(SUCCESS)
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| CliError::new(format!("signal handler setup failed: {err}")))
}
