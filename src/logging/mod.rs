pub mod logger;

pub use logger::{init_logger, log_file_path, LOG_FILE_NAME};
