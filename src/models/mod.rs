mod about;
mod paper;
mod post;
mod user;

pub use about::*;
pub use paper::*;
pub use post::*;
pub use user::*;
