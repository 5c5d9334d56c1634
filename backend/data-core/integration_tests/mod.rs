//! End-to-end tests against a mocked REST backend and on-disk SQLite.

mod http;
mod repository;
mod support;
