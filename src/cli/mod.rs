// Command-line definitions for the installer.
pub mod cmd_enums;
