pub mod image_tool;
pub mod prompter;

pub use image_tool::{ImageTool, MagickTool};
pub use prompter::{LinePrompter, Prompter, Question, StdinPrompter};
