pub mod init;
pub mod render;
pub mod score;
pub mod validate;
