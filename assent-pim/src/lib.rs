mod errors;
pub mod matcher;
pub mod req;
pub mod statement;
mod warden;

pub use errors::WardenError;
pub use matcher::{reg::Regexp, Matcher};
pub use req::Request;
pub use statement::{Effect, Statement};
pub use warden::{MockWarden, StaticWarden, Warden};
