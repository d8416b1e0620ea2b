//! Fetch a user's article listings from note, Zenn or Qiita, page by page,
//! then filter and export them.

pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod services;
pub mod sources;
