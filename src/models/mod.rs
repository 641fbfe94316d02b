pub mod query;
pub mod summary;
pub mod variable;

pub use query::*;
pub use summary::*;
pub use variable::*;
