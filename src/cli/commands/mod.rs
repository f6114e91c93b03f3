//! One module per subcommand; each exposes an `execute` function.

pub mod delete;
pub mod exists;
pub mod generate;
pub mod init;
pub mod list;
pub mod mark_deployed;
pub mod reveal;
pub mod rotate;
pub mod set;
