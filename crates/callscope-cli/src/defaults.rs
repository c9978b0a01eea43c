//! Default values for command-line options.

use callscope_tree::Direction;

use crate::logging::LogFormat;

/// Default log filter expression.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default number of levels expanded below the roots.
pub const DEFAULT_DEPTH: usize = 1;

/// Default direction: who calls the starting symbol.
pub const DEFAULT_DIRECTION: Direction = Direction::CallsTo;

/// Default logging format. Logs go to stderr, so keep them readable.
pub const DEFAULT_LOG_FORMAT: LogFormat = LogFormat::Compact;

/// Default language identifier sent with `textDocument/didOpen`.
pub const DEFAULT_LANGUAGE_ID: &str = "rust";
