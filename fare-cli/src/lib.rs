pub mod command;
pub mod config_file;
pub mod csv_rows;
pub mod logging;
pub mod report;
pub mod session;
