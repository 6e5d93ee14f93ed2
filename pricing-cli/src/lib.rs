pub mod export;
pub mod render;
pub mod report;
pub mod utils;
