pub mod analytics;
pub mod board;
pub mod bug;
pub mod dashboard;
pub mod init;
pub mod user;
