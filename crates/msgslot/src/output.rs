use std::io::Write;

use clap::ValueEnum;
use serde::Serialize;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// The message bytes, verbatim.
    Raw,
    /// One JSON object per message.
    Json,
    /// A human-readable summary line.
    Pretty,
}

#[derive(Serialize)]
struct MessageOutput {
    instance: u8,
    channel: u32,
    length: usize,
    payload: String,
}

pub fn print_message(instance: u8, channel: u32, payload: &[u8], format: OutputFormat) {
    match format {
        OutputFormat::Raw => print_raw(payload),
        OutputFormat::Json => {
            let out = MessageOutput {
                instance,
                channel,
                length: payload.len(),
                payload: payload_preview(payload),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Pretty => {
            println!(
                "instance={instance} channel={channel} length={} payload={}",
                payload.len(),
                payload_preview(payload)
            );
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn payload_preview(payload: &[u8]) -> String {
    match std::str::from_utf8(payload) {
        Ok(text) => text.to_string(),
        Err(_) => format!("<binary {} bytes>", payload.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_passes_utf8_through() {
        assert_eq!(payload_preview(b"hello"), "hello");
    }

    #[test]
    fn preview_summarizes_binary() {
        assert_eq!(payload_preview(&[0xFF, 0xFE]), "<binary 2 bytes>");
    }
}
