use std::io::{self, BufRead, Write};

use camino::Utf8Path;

/// Approval gate consulted before a scope is wiped.
pub trait Confirm {
    fn confirm(&mut self, scope_dir: &Utf8Path) -> io::Result<bool>;
}

/// Approves every deletion without asking.
#[derive(Clone, Copy, Debug, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, _scope_dir: &Utf8Path) -> io::Result<bool> {
        Ok(true)
    }
}

/// Asks `Continue (Y/n)?` on a line-oriented terminal.
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
}

impl TerminalPrompt<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Confirm for TerminalPrompt<R, W> {
    fn confirm(&mut self, scope_dir: &Utf8Path) -> io::Result<bool> {
        writeln!(self.output, "Old runs under {} will be deleted.", scope_dir)?;
        write!(self.output, "  Continue (Y/n)? ")?;
        self.output.flush()?;

        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "no answer to the deletion prompt",
            ));
        }
        Ok(is_affirmative(buf.trim_end_matches(['\n', '\r'])))
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer, "" | "y" | "Y")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn ask(input: &str) -> (bool, String) {
        let mut out = Vec::new();
        let approved = TerminalPrompt::new(Cursor::new(input.as_bytes()), &mut out)
            .confirm(Utf8Path::new("/tmp/x/exp1"))
            .unwrap();
        (approved, String::from_utf8(out).unwrap())
    }

    #[test]
    fn prompt_text_is_exact() {
        let (_, shown) = ask("\n");
        assert_eq!(
            shown,
            "Old runs under /tmp/x/exp1 will be deleted.\n  Continue (Y/n)? "
        );
    }

    #[test]
    fn accepts_enter_and_y() {
        assert!(ask("\n").0);
        assert!(ask("y\n").0);
        assert!(ask("Y\r\n").0);
    }

    #[test]
    fn closed_input_is_not_an_answer() {
        let mut out = Vec::new();
        let err = TerminalPrompt::new(Cursor::new(&b""[..]), &mut out)
            .confirm(Utf8Path::new("/tmp/x/exp1"))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn anything_else_declines() {
        for answer in ["n\n", "N\n", "yes\n", " y\n", "q\n"] {
            assert!(!ask(answer).0, "{answer:?}");
        }
    }

    #[test]
    fn assume_yes_never_asks() {
        assert!(AssumeYes.confirm(Utf8Path::new("anywhere")).unwrap());
    }
}
