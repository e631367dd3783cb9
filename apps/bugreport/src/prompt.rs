//! Console interaction.

use std::io::{self, BufRead, Write};

const EMPTY_INPUT: &str = "Ввод не может быть пустым. Попробуйте снова.";

/// Line-oriented user dialogue.
pub trait Prompt {
    /// Shows `question` without a line break and reads one answer line.
    ///
    /// The trailing line terminator is stripped. End of input is an error.
    fn ask(&mut self, question: &str) -> io::Result<String>;

    /// Shows one line of text.
    fn say(&mut self, line: &str);
}

/// Prompt over the process stdin and stdout.
pub struct ConsolePrompt<R, W> {
    input: R,
    output: W,
}

impl ConsolePrompt<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsolePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Prompt for ConsolePrompt<R, W> {
    fn ask(&mut self, question: &str) -> io::Result<String> {
        write!(self.output, "{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed before an answer was given",
            ));
        }
        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(line)
    }

    fn say(&mut self, line: &str) {
        let _ = writeln!(self.output, "{line}");
    }
}

/// Asks until the trimmed answer is non-empty.
pub fn ask_non_empty(prompt: &mut dyn Prompt, question: &str) -> io::Result<String> {
    loop {
        let answer = prompt.ask(question)?;
        let answer = answer.trim();
        if !answer.is_empty() {
            return Ok(answer.to_string());
        }
        prompt.say(EMPTY_INPUT);
    }
}

/// Prompt replaying canned answers and recording everything shown.
#[cfg(test)]
pub struct ScriptedPrompt {
    answers: std::collections::VecDeque<String>,
    pub transcript: Vec<String>,
}

#[cfg(test)]
impl ScriptedPrompt {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            transcript: Vec::new(),
        }
    }

    pub fn shown(&self, text: &str) -> bool {
        self.transcript.iter().any(|line| line.contains(text))
    }
}

#[cfg(test)]
impl Prompt for ScriptedPrompt {
    fn ask(&mut self, question: &str) -> io::Result<String> {
        self.transcript.push(question.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))
    }

    fn say(&mut self, line: &str) {
        self.transcript.push(line.to_string());
    }
}
