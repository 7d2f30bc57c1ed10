mod issue;
mod project;
mod user;

pub use issue::*;
pub use project::Project;
pub use user::User;
