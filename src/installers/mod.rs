// Shell integration for unprivileged installs.
pub mod shellrc;
