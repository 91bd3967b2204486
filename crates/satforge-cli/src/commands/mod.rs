pub mod fetch;
pub mod generate;
pub mod init;
pub mod validate;
