mod log;
mod parse;
mod recover;
mod span;

pub use log::Log;
pub use parse::Parse;
pub use recover::Recover;
pub use span::{MakeSpanWithTrace, TRACE_ID};
