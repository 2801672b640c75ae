pub mod mailer;
pub mod store;
pub mod waitlist;
