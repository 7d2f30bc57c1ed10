pub mod auth;
pub mod charts;
pub mod init;
pub mod issues;
pub mod projects;
