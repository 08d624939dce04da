pub mod signup;
pub mod user;

pub use signup::*;
pub use user::*;
