//! Integration test modules

mod battle;
mod config_file;
mod decryption;
