// Infrastructure layer module
// Contains the terminal and file adapters and the completion service client
// Follows Hexagonal Architecture: the ports live in `agents`

pub mod openai;
pub mod report_files;
pub mod terminal;

pub use openai::{OpenAiGateway, OpenAiSettings};
pub use report_files::{FileReportWriter, MemoryReportWriter};
pub use terminal::{LinePurposeReader, TerminalReportWriter};
