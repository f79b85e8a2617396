//! Command handlers, one module per subcommand.

pub mod completions;
pub mod extensions;
pub mod init;
pub mod new;
