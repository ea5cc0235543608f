pub mod chapters;
pub mod controller;
pub mod error;
pub mod mode;
pub mod playback;
pub mod record;
pub mod session;
pub mod trim;
pub mod types;
