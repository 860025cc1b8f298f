#![allow(dead_code)]

mod test_app;

pub use test_app::{FakeSource, TestApp, unreachable_url};
