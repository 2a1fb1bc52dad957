pub mod heat;
pub mod ranking;
pub mod rules;
pub mod session;
