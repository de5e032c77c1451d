pub mod image_format;
pub mod item;

pub use image_format::ImageFormat;
pub use item::{BatchStats, Item, ItemOutcome, Rotation};
