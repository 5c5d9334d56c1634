mod config;
mod logger;
mod memory;
mod sqlite;
mod support;
