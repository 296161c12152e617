//! donotcommit: serves `.gitignore` templates over HTTP
//!
//! `GET /api/list` lists every template in the corpus and
//! `GET /api/python,lua` returns the named templates concatenated.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
pub mod templates;
