pub use formatters::*;
pub use list::*;
pub use profile::*;

mod formatters;
mod list;
mod profile;
