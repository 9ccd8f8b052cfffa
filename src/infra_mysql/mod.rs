mod schema_provisioner;
mod user_repo_mysql;

pub use schema_provisioner::*;
pub use user_repo_mysql::*;
