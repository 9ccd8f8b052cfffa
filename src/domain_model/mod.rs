mod row_count;
mod user;

pub use row_count::*;
pub use user::*;
