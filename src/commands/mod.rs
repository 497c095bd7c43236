pub mod fetch;
pub mod init;
