//! Line-oriented prompt reader.

use std::io::{self, BufRead, Write};

use thiserror::Error;

/// Errors raised while talking to the terminal.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// Standard input reached end of file.
    #[error("input closed")]
    InputClosed,
    #[error("console I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Prompts on `output` and reads answers from `input`, one line at a time.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// The stream menus and query results are written to.
    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Writes one line.
    pub fn say(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.output, "{line}")
    }

    /// Writes `prompt` (without a newline) and returns the next input line,
    /// minus its line terminator.
    ///
    /// Bytes that are not valid UTF-8 are replaced with U+FFFD.
    pub fn read_line(&mut self, prompt: &str) -> Result<String, ConsoleError> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut buf = Vec::new();
        if self.input.read_until(b'\n', &mut buf)? == 0 {
            return Err(ConsoleError::InputClosed);
        }
        let mut line = match String::from_utf8(buf) {
            Ok(line) => line,
            Err(e) => {
                tracing::debug!("replacing invalid UTF-8 in console input");
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        };
        let trimmed_len = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed_len);
        Ok(line)
    }

    /// Reads an integer menu choice, re-prompting until one parses.
    pub fn read_choice(&mut self) -> Result<i32, ConsoleError> {
        loop {
            let line = self.read_line("Please make your choice: ")?;
            match line.trim().parse() {
                Ok(choice) => return Ok(choice),
                Err(_) => {
                    tracing::debug!(input = %line, "rejected menu choice");
                    self.say("Your input is invalid!")?;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn console(input: &str) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
        Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn printed(console: Console<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(console.into_output()).expect("output should be utf-8")
    }

    #[test]
    fn read_line_strips_line_endings_only() {
        let mut console = console("  Iced Latte \r\nnext\n");
        assert_eq!(console.read_line("> ").unwrap(), "  Iced Latte ");
        assert_eq!(console.read_line("> ").unwrap(), "next");
        assert_eq!(printed(console), "> > ");
    }

    #[test]
    fn read_line_accepts_empty_answers() {
        let mut console = console("\n");
        assert_eq!(console.read_line("URL: ").unwrap(), "");
    }

    #[test]
    fn read_line_reports_end_of_input() {
        let mut console = console("");
        let err = console.read_line("> ").expect_err("eof should fail");
        assert!(matches!(err, ConsoleError::InputClosed));
    }

    #[test]
    fn last_line_without_newline_is_returned() {
        let mut console = console("9");
        assert_eq!(console.read_line("> ").unwrap(), "9");
    }

    #[test]
    fn invalid_utf8_is_replaced_not_rejected() {
        let mut console =
            Console::new(Cursor::new(b"al\xffice\nnext\n".to_vec()), Vec::new());
        assert_eq!(console.read_line("> ").unwrap(), "al\u{FFFD}ice");
        assert_eq!(console.read_line("> ").unwrap(), "next");
    }

    #[test]
    fn read_choice_reprompts_until_integer() {
        let mut console = console("abc\n\n 7 \n");
        assert_eq!(console.read_choice().unwrap(), 7);
        assert_eq!(
            printed(console),
            "Please make your choice: Your input is invalid!\n\
             Please make your choice: Your input is invalid!\n\
             Please make your choice: "
        );
    }

    #[test]
    fn read_choice_gives_up_at_end_of_input() {
        let mut console = console("x\n");
        let err = console.read_choice().expect_err("eof should fail");
        assert!(matches!(err, ConsoleError::InputClosed));
    }
}
