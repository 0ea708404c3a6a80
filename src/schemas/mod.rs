// Host facts the installer branches on.
pub mod platform_context;
