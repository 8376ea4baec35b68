use std::io::{self, BufRead, BufReader, IsTerminal, Stdin, Stdout, Write};

use crossterm::style::{Stylize, style};

use crate::session::quiz::{Console, Outcome};

/// Line-oriented console over any reader/writer pair.
pub struct LineConsole<R, W> {
    input: R,
    output: W,
    color: bool,
}

impl LineConsole<BufReader<Stdin>, Stdout> {
    pub fn stdio() -> Self {
        let output = io::stdout();
        let color = output.is_terminal();
        Self {
            input: BufReader::new(io::stdin()),
            output,
            color,
        }
    }
}

impl<R: BufRead, W: Write> LineConsole<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            color: false,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Console for LineConsole<R, W> {
    fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        write!(self.output, "{question}? ")?;
        self.output.flush()?;

        // Raw bytes: a line that is not valid UTF-8 is still an answer.
        let mut line = Vec::new();
        if self.input.read_until(b'\n', &mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&line).into_owned()))
    }

    fn show_outcome(&mut self, outcome: &Outcome) -> io::Result<()> {
        let tally = format!("({}/{})", outcome.correct_total, outcome.answered);
        let verdict = if outcome.correct {
            "correct!".to_string()
        } else {
            format!("incorrect ({})!", outcome.item.answer)
        };
        match (self.color, outcome.correct) {
            (true, true) => writeln!(self.output, "{tally} {}", style(verdict).green()),
            (true, false) => writeln!(self.output, "{tally} {}", style(verdict).red()),
            (false, _) => writeln!(self.output, "{tally} {verdict}"),
        }
    }
}
