pub mod health;
pub mod pages;
pub mod waitlist;

pub use health::*;
pub use pages::*;
pub use waitlist::*;
