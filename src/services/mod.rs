pub mod atlas;
pub mod server;
