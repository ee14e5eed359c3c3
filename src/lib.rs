//! Wicket - minimal HTTP/1.1 server
//!
//! One request per connection: parse, route, respond, close.

pub mod config;
pub mod http;
pub mod routes;
pub mod server;
