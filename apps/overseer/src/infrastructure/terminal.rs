use std::io::{self, BufRead, Write};

use crate::agents::errors::AgentResult;
use crate::agents::human::{PurposeReader, ReportWriter};

/// Prompts on one stream and reads a single line from another
pub struct LinePurposeReader<R, W> {
    input: R,
    prompt_out: W,
    prompt: String,
}

impl LinePurposeReader<io::StdinLock<'static>, io::Stdout> {
    /// Read the goal from standard input
    pub fn stdin() -> Self {
        Self::new(io::stdin().lock(), io::stdout(), "Enter your goal: ")
    }
}

impl<R: BufRead, W: Write> LinePurposeReader<R, W> {
    pub fn new(input: R, prompt_out: W, prompt: impl Into<String>) -> Self {
        Self {
            input,
            prompt_out,
            prompt: prompt.into(),
        }
    }
}

impl<R: BufRead, W: Write> PurposeReader for LinePurposeReader<R, W> {
    fn read(&mut self) -> AgentResult<String> {
        write!(self.prompt_out, "{}", self.prompt)?;
        self.prompt_out.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// Prints the report to standard output
#[derive(Debug, Default)]
pub struct TerminalReportWriter;

impl ReportWriter for TerminalReportWriter {
    fn write(&mut self, report: &str) -> AgentResult<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{report}")?;
        stdout.flush()?;
        Ok(())
    }
}
