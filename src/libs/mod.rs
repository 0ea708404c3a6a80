// Installer building blocks shared by the commands.

pub mod paths;
pub mod privileged_writer;
pub mod rc_markers;
pub mod utilities;
