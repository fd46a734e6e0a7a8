//! Operator input
//!
//! All reads from the operator go through the `Prompter` trait so the guard
//! harness and the parameter resolver can be driven by a script in tests
//! and so a non-interactive run can be shown to never block on input.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use crate::error::{Result, SetupError};
use crate::theme::Styles;

/// Source of operator answers
pub trait Prompter {
    /// Show `label` and read one line, without the trailing newline.
    fn read_line(&mut self, label: &str) -> Result<String>;
}

/// Interpreted answer to a yes/no question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
    /// Anything else; callers treat it as `No` without asking again
    Invalid,
}

impl Answer {
    pub fn parse(input: &str) -> Self {
        match input.trim().to_lowercase().as_str() {
            "y" | "yes" => Self::Yes,
            "n" | "no" => Self::No,
            _ => Self::Invalid,
        }
    }
}

/// Ask a yes/no question exactly once.
pub fn ask_yes_no(prompter: &mut dyn Prompter, question: &str) -> Result<Answer> {
    crate::theme::prompt_line(question);
    let raw = prompter.read_line("(Y/n): ")?;
    Ok(Answer::parse(&raw))
}

/// Reads from the process stdin
#[derive(Debug, Default)]
pub struct StdinPrompter;

impl Prompter for StdinPrompter {
    fn read_line(&mut self, label: &str) -> Result<String> {
        let mut stdout = io::stdout();
        write!(stdout, "{}", Styles::prompt().apply_to(label))?;
        stdout.flush()?;

        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Err(SetupError::input("stdin closed while waiting for an answer"));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// Replays canned answers and records every label it was asked with.
///
/// Running out of answers is an error rather than a hang, which is what
/// makes "never reads in non-interactive mode" checkable.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    asked: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }

    /// A prompter with no answers at all
    pub fn silent() -> Self {
        Self::default()
    }

    /// Labels of every read, in order
    pub fn asked(&self) -> &[String] {
        &self.asked
    }

    pub fn reads(&self) -> usize {
        self.asked.len()
    }
}

impl Prompter for ScriptedPrompter {
    fn read_line(&mut self, label: &str) -> Result<String> {
        self.asked.push(label.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| SetupError::input(format!("no scripted answer for {:?}", label)))
    }
}
