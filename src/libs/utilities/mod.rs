// Low-level helpers used by the install and uninstall commands.

pub mod download;
pub mod file_operations;
