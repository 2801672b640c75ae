
#[allow(unused_imports)]
pub use helpers::{MemoryStore, ScriptedMailer, generate_test_email};
#[allow(unused_imports)]
pub use test_app::{MailerBackend, StoreBackend, TEST_SERVICE_KEY, TestApp, TestAppOptions};
