pub mod add;
pub mod commit;
pub mod init;
pub mod log;
pub mod ls_files;
pub mod rm;
