//! Blocking operator decisions.
//!
//! Every question re-asks until it gets a valid answer. The only way out
//! without one is the input handle closing, which is an error.

use std::io::{BufRead, ErrorKind, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use colored::Colorize;

/// Source of operator answers.
pub trait DecisionProvider {
    /// Ask a yes/no question.
    fn yes_no(&mut self, message: &str) -> Result<bool>;

    /// Ask for a directory. With `create`, a missing directory is created
    /// instead of being rejected.
    fn directory(&mut self, message: &str, create: bool) -> Result<PathBuf>;

    /// Ask for one of `options` (`key`, description). Returns the key.
    fn choose(&mut self, message: &str, options: &[(char, &str)]) -> Result<char>;
}

/// Line-oriented prompter over any input/output pair.
pub struct ConsolePrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsolePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Next trimmed line. A closed input is an error, never an empty answer.
    pub fn read_line(&mut self) -> Result<String> {
        self.output.flush().context("failed to flush console")?;
        let mut line = String::new();
        let n = self
            .input
            .read_line(&mut line)
            .context("failed to read from console")?;
        if n == 0 {
            bail!("input closed while waiting for an answer");
        }
        Ok(line.trim().to_owned())
    }

    fn say(&mut self, message: impl std::fmt::Display) -> Result<()> {
        writeln!(self.output, "{message}").context("failed to write to console")
    }
}

impl<R: BufRead, W: Write> DecisionProvider for ConsolePrompter<R, W> {
    fn yes_no(&mut self, message: &str) -> Result<bool> {
        loop {
            self.say(format!("{message} [y/n]").white())?;
            match self.read_line()?.to_lowercase().as_str() {
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => self.say("Valid answers: y, n, yes, no".white())?,
            }
        }
    }

    fn directory(&mut self, message: &str, create: bool) -> Result<PathBuf> {
        let mut first = true;
        loop {
            self.say(message.white())?;
            if create && first {
                self.say("(If the directory does not exist, it will be created)".white())?;
            }
            first = false;

            let answer = self.read_line()?;
            if answer.is_empty() {
                continue;
            }
            let path = PathBuf::from(answer);

            match std::fs::metadata(&path) {
                Ok(meta) if meta.is_dir() => return Ok(path),
                Ok(_) => self.say("This is not a directory".yellow())?,
                Err(err) if err.kind() == ErrorKind::NotFound => {
                    if !create {
                        self.say("Directory does not exist".yellow())?;
                        continue;
                    }
                    match std::fs::create_dir_all(&path) {
                        Ok(()) => {
                            self.say(format!("directory {} created", path.display()).green())?;
                            return Ok(path);
                        }
                        Err(err) => self.say(err.to_string().yellow())?,
                    }
                }
                Err(err) => self.say(err.to_string().yellow())?,
            }
        }
    }

    fn choose(&mut self, message: &str, options: &[(char, &str)]) -> Result<char> {
        let keys = options
            .iter()
            .map(|(k, _)| k.to_string())
            .collect::<Vec<_>>()
            .join("/");
        loop {
            self.say(format!("{message} [{keys}]").white())?;
            for (key, description) in options {
                self.say(format!("{key}: {description}").white())?;
            }

            let answer = self.read_line()?.to_lowercase();
            if answer.is_empty() {
                continue;
            }
            let mut chars = answer.chars();
            if let (Some(c), None) = (chars.next(), chars.next()) {
                if options.iter().any(|(k, _)| *k == c) {
                    return Ok(c);
                }
            }
            self.say(format!("Valid answers: [{keys}]").white())?;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use tempfile::TempDir;

    use super::*;

    fn scripted(input: &str) -> ConsolePrompter<Cursor<Vec<u8>>, Vec<u8>> {
        ConsolePrompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn yes_no_reprompts_until_valid() {
        let mut p = scripted("\nmaybe\nYES\n");
        assert!(p.yes_no("Continue?").unwrap());
        let out = String::from_utf8(p.output).unwrap();
        assert_eq!(out.matches("Valid answers: y, n, yes, no").count(), 2);
    }

    #[test]
    fn yes_no_accepts_no() {
        assert!(!scripted("n\n").yes_no("Continue?").unwrap());
    }

    #[test]
    fn closed_input_is_an_error() {
        let err = scripted("what\n").yes_no("Continue?").unwrap_err();
        assert!(err.to_string().contains("input closed"));
    }

    #[test]
    fn choose_rejects_out_of_set_and_multi_char() {
        let options = [('d', "Delete"), ('n', "Nothing")];
        let mut p = scripted("x\ndn\n\nD\n");
        assert_eq!(p.choose("What now?", &options).unwrap(), 'd');
        let out = String::from_utf8(p.output).unwrap();
        assert_eq!(out.matches("Valid answers: [d/n]").count(), 2);
    }

    #[test]
    fn directory_requires_existing_dir_without_create() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("file");
        std::fs::write(&file, b"").unwrap();
        let missing = tmp.path().join("missing");
        let input = format!(
            "{}\n{}\n{}\n",
            missing.display(),
            file.display(),
            tmp.path().display()
        );

        let mut p = scripted(&input);
        assert_eq!(p.directory("Where?", false).unwrap(), tmp.path());
        assert!(!missing.exists());
        let out = String::from_utf8(p.output).unwrap();
        assert!(out.contains("Directory does not exist"));
        assert!(out.contains("This is not a directory"));
    }

    #[test]
    fn directory_creates_when_allowed() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("a").join("b");
        let mut p = scripted(&format!("{}\n", target.display()));
        assert_eq!(p.directory("Where?", true).unwrap(), target);
        assert!(target.is_dir());
    }
}
