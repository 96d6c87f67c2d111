mod admin;
mod receipt;
mod subscription;
mod user;

pub use admin::*;
pub use receipt::*;
pub use subscription::*;
pub use user::*;
