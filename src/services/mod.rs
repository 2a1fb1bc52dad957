pub mod export;
pub mod heat;
pub mod priority;
pub mod scoring;
pub mod session;
