//! Configuration loading and management

mod loader;
