pub mod engine;
pub mod selector;
pub mod session;
pub mod types;
pub mod users;
pub mod vocab;
