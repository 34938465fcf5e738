// Library exports for biso-server
// This allows other crates in the workspace to use biso-server modules

pub mod api;
pub mod config;
pub mod db;
pub mod hashtag;
pub mod ranking;
pub mod similarity;
pub mod state;
