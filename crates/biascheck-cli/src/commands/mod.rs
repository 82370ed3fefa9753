pub mod analyze;
pub mod exam;
pub mod guidelines;
pub mod init;
pub mod remediate;
pub mod validate;
