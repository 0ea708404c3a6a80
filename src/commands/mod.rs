// Register the installer's two operations.

// Downloads epm, places it and wires up PATH and the sudo wrapper.
pub mod install;
// Removes epm and the PATH export block.
pub mod uninstall;
