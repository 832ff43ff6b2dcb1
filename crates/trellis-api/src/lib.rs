pub mod client;

pub use client::{Credentials, TrelloClient, DEFAULT_BASE_URL};
