//! Interactive prompts. Everything goes through the [`Prompter`] trait so
//! the orchestrator can be driven by a scripted double in tests.
//!
//! Cancellation is a value, not an error: `Ok(None)` means the user backed
//! out (EOF or an explicit decline) and the caller unwinds cleanly.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use anyhow::{bail, Result};

pub trait Prompter {
    /// Pick one of `options` by number. Returns the selected index.
    fn select(&self, prompt: &str, options: &[String]) -> Result<Option<usize>>;

    /// Yes/no question; `default` is used on an empty answer.
    fn confirm(&self, prompt: &str, default: bool) -> Result<Option<bool>>;

    /// Free-form line, re-prompting until `validate` accepts it.
    fn text(
        &self,
        prompt: &str,
        validate: &dyn Fn(&str) -> Result<()>,
    ) -> Result<Option<String>>;
}

/// Reads answers from stdin.
pub struct StdinPrompter;

impl StdinPrompter {
    fn read_line(&self) -> Result<Option<String>> {
        let mut line = String::new();
        let n = io::stdin().lock().read_line(&mut line)?;
        if n == 0 {
            // EOF is a cancel, not an error
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

impl Prompter for StdinPrompter {
    fn select(&self, prompt: &str, options: &[String]) -> Result<Option<usize>> {
        println!("\n{}", prompt);
        for (i, option) in options.iter().enumerate() {
            println!("  {}) {}", i + 1, option);
        }

        loop {
            print!("Enter choice [1-{}]: ", options.len());
            io::stdout().flush()?;
            let line = match self.read_line()? {
                Some(line) => line,
                None => return Ok(None),
            };
            match line.parse::<usize>() {
                Ok(n) if n >= 1 && n <= options.len() => return Ok(Some(n - 1)),
                _ => println!("Please enter a number between 1 and {}", options.len()),
            }
        }
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<Option<bool>> {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        loop {
            print!("{} {} ", prompt, hint);
            io::stdout().flush()?;
            let line = match self.read_line()? {
                Some(line) => line.to_lowercase(),
                None => return Ok(None),
            };
            match line.as_str() {
                "" => return Ok(Some(default)),
                "y" | "yes" => return Ok(Some(true)),
                "n" | "no" => return Ok(Some(false)),
                _ => println!("Please answer y or n"),
            }
        }
    }

    fn text(
        &self,
        prompt: &str,
        validate: &dyn Fn(&str) -> Result<()>,
    ) -> Result<Option<String>> {
        loop {
            print!("{}: ", prompt);
            io::stdout().flush()?;
            let line = match self.read_line()? {
                Some(line) => line,
                None => return Ok(None),
            };
            match validate(&line) {
                Ok(()) => return Ok(Some(line)),
                Err(e) => println!("{}", e),
            }
        }
    }
}

/// True when stdin is attached to a terminal; interactive flows require it.
pub fn stdin_is_tty() -> bool {
    atty::is(atty::Stream::Stdin)
}

/// Scripted answers for tests. Panics in `Drop` are avoided; unconsumed
/// answers are simply dropped.
#[derive(Debug, Clone)]
pub enum Answer {
    Select(usize),
    Confirm(bool),
    Text(String),
    /// Simulates the user backing out at this prompt.
    Cancel,
}

pub struct ScriptedPrompter {
    answers: std::cell::RefCell<VecDeque<Answer>>,
}

impl ScriptedPrompter {
    pub fn new(answers: Vec<Answer>) -> Self {
        ScriptedPrompter {
            answers: std::cell::RefCell::new(answers.into()),
        }
    }

    fn next(&self, expected: &str) -> Result<Option<Answer>> {
        match self.answers.borrow_mut().pop_front() {
            Some(Answer::Cancel) => Ok(None),
            Some(answer) => Ok(Some(answer)),
            None => bail!("scripted prompter ran out of answers (wanted {})", expected),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn select(&self, prompt: &str, options: &[String]) -> Result<Option<usize>> {
        match self.next("select")? {
            None => Ok(None),
            Some(Answer::Select(i)) => {
                if i >= options.len() {
                    bail!("scripted selection {} out of range for '{}'", i, prompt);
                }
                Ok(Some(i))
            }
            Some(other) => bail!("expected Select for '{}', got {:?}", prompt, other),
        }
    }

    fn confirm(&self, prompt: &str, _default: bool) -> Result<Option<bool>> {
        match self.next("confirm")? {
            None => Ok(None),
            Some(Answer::Confirm(b)) => Ok(Some(b)),
            Some(other) => bail!("expected Confirm for '{}', got {:?}", prompt, other),
        }
    }

    fn text(
        &self,
        prompt: &str,
        validate: &dyn Fn(&str) -> Result<()>,
    ) -> Result<Option<String>> {
        match self.next("text")? {
            None => Ok(None),
            Some(Answer::Text(s)) => {
                validate(&s)?;
                Ok(Some(s))
            }
            Some(other) => bail!("expected Text for '{}', got {:?}", prompt, other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_answers_in_order() {
        let prompter = ScriptedPrompter::new(vec![
            Answer::Select(2),
            Answer::Confirm(true),
            Answer::Text("my-app".to_string()),
        ]);

        let options: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        assert_eq!(prompter.select("pick", &options).unwrap(), Some(2));
        assert_eq!(prompter.confirm("sure?", false).unwrap(), Some(true));
        assert_eq!(
            prompter.text("name", &|_| Ok(())).unwrap(),
            Some("my-app".to_string())
        );
    }

    #[test]
    fn test_cancel_becomes_none() {
        let prompter = ScriptedPrompter::new(vec![Answer::Cancel]);
        let options = vec!["only".to_string()];
        assert_eq!(prompter.select("pick", &options).unwrap(), None);
    }

    #[test]
    fn test_type_mismatch_is_an_error() {
        let prompter = ScriptedPrompter::new(vec![Answer::Confirm(true)]);
        let options = vec!["only".to_string()];
        assert!(prompter.select("pick", &options).is_err());
    }

    #[test]
    fn test_exhausted_script_is_an_error() {
        let prompter = ScriptedPrompter::new(vec![]);
        assert!(prompter.confirm("sure?", true).is_err());
    }
}
