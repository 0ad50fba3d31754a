pub mod inputs;
pub mod inspect;
pub mod project;
pub mod report;
pub mod util;

pub use inputs::*;
pub use inspect::*;
pub use project::*;
pub use report::*;
pub use util::*;
