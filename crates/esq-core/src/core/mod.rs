pub mod backend;
pub mod query;
pub mod results;
pub mod session;
pub mod time_range;
