pub mod engine;
pub mod navigation;
pub mod pagination;
pub mod session;
pub mod time;
