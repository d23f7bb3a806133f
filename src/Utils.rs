//! different utility modules used throughout the project
/// tiny module to set up terminal and file logging
pub mod logger;
/// settings of the demo binary read from a TOML file
pub mod config;
