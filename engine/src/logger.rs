use std::sync::OnceLock;

use chrono::Local;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

static PREFIX: OnceLock<Option<String>> = OnceLock::new();

/// Install the optional line prefix. Only the first call takes effect.
/// Logging works without initialisation and simply omits the prefix.
pub fn init_logger(prefix: Option<String>) {
    let _ = PREFIX.set(prefix);
}

pub fn log(message: &str) {
    let prefix = PREFIX.get().and_then(|p| p.as_deref());
    println!("{}", format_line(prefix, message));
}

fn format_line(prefix: Option<&str>, message: &str) -> String {
    let timestamp = Local::now().format(TIMESTAMP_FORMAT);
    match prefix {
        Some(prefix) => format!("[{}][{}] {}", timestamp, prefix, message),
        None => format!("[{}] {}", timestamp, message),
    }
}

#[macro_export]
macro_rules! log {
    ($($arg:tt)*) => {
        $crate::logger::log(&format!($($arg)*))
    };
}
