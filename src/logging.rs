use std::fs::OpenOptions;
use std::io::{IsTerminal, Write};

use crate::util::parse_bool_flag;

const DEFAULT_LOG_PATH: &str = "/tmp/toolscope-debug.log";
const DEBUG_MARKUP_ENV: &str = "TOOLSCOPE_DEBUG_MARKUP";
const LOG_PATH_ENV: &str = "TOOLSCOPE_LOG_PATH";

/// Gate for the verbose per-scan trace. Warnings are always emitted.
pub fn debug_markup_enabled() -> bool {
    std::env::var(DEBUG_MARKUP_ENV)
        .ok()
        .and_then(parse_bool_flag)
        .unwrap_or(false)
}

/// An assistant message carried invocation markers but no invocation could be
/// recovered from it. The message is skipped; this is the only trace of that.
pub fn emit_malformed_markup(message_id: &str, detail: &str) {
    let message =
        format!("TOOLSCOPE WARN malformed_markup message_id={message_id} detail={detail}\n");
    emit_log_message(&message);
}

/// The transport re-delivered a shorter buffer than one already seen for the
/// same message. The chunk was dropped to preserve append-only growth.
pub fn emit_buffer_regression(message_id: &str, kept_len: usize, incoming_len: usize) {
    let message = format!(
        "TOOLSCOPE WARN buffer_regression message_id={message_id} kept_len={kept_len} incoming_len={incoming_len}\n"
    );
    emit_log_message(&message);
}

pub fn emit_markup_trace(message_id: &str, buffer_len: usize, preview: &str) {
    let message = format!(
        "TOOLSCOPE DEBUG markup_scan message_id={message_id} buffer_len={buffer_len}\npreview:\n{preview}\n"
    );
    emit_log_message(&message);
}

fn emit_log_message(message: &str) {
    if let Some(path) = resolve_log_path() {
        if append_log_file(&path, message).is_ok() {
            return;
        }
    }

    eprintln!("{message}");
}

fn resolve_log_path() -> Option<String> {
    std::env::var(LOG_PATH_ENV)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| {
            if std::io::stderr().is_terminal() {
                Some(DEFAULT_LOG_PATH.to_string())
            } else {
                None
            }
        })
}

fn append_log_file(path: &str, message: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(message.as_bytes())
}
