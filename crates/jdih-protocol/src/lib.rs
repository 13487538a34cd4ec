pub mod history;
pub mod platform;
pub mod query;
pub mod records;
pub mod status;

pub use history::*;
pub use platform::*;
pub use query::*;
pub use records::*;
pub use status::*;
