pub mod input_validator;
pub mod interactive_session;
pub mod report_writer;
pub mod token_ring;

pub use input_validator::InputValidator;
pub use interactive_session::{InteractiveSession, PendingCaption};
pub use report_writer::ReportWriter;
pub use token_ring::{TokenRing, Turn};
