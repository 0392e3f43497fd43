//! Routes `log` records from the editor core to the browser console.

use zoon::{eprintln, println};

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        match record.level() {
            log::Level::Error | log::Level::Warn => {
                eprintln!("[{}] {}: {}", record.level(), record.target(), record.args())
            }
            _ => println!("[{}] {}: {}", record.level(), record.target(), record.args()),
        }
    }

    fn flush(&self) {}
}

pub fn init(level: log::LevelFilter) {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}
