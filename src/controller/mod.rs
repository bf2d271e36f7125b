pub use clock::*;
pub use reveal::*;
pub use sentinel::*;

mod clock;
mod reveal;
mod sentinel;
