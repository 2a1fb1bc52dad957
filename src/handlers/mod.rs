pub mod export;
pub mod heat;
pub mod session;
