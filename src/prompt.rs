//! Line-based operator prompts that repeat until the answer is valid.

use std::io::{self, BufRead, Write};

use crate::config::SurveyConfig;
use crate::source::{DatePart, SurveyDate};

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Reads one trimmed line. End of input is an error so callers never
    /// spin on a closed stdin.
    fn ask(&mut self, question: &str) -> io::Result<String> {
        write!(self.output, "{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed while waiting for an answer",
            ));
        }
        Ok(line.trim().to_string())
    }

    fn say(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{message}")
    }

    /// Asks until the answer is an integer within the bounds of `part`.
    pub fn ask_date_part(
        &mut self,
        question: &str,
        part: DatePart,
        config: &SurveyConfig,
    ) -> io::Result<i32> {
        let (lo, hi) = part.bounds(config);
        loop {
            let answer = self.ask(question)?;
            match answer.parse::<i32>() {
                Ok(value) if (lo..=hi).contains(&value) => return Ok(value),
                Ok(_) => self.say(&part.range_message(config))?,
                Err(_) => self.say("Integer required")?,
            }
        }
    }

    pub fn ask_date(&mut self, config: &SurveyConfig) -> io::Result<SurveyDate> {
        let day = self.ask_date_part(
            "Please enter the day of the survey in the format dd: ",
            DatePart::Day,
            config,
        )?;
        let month = self.ask_date_part(
            "Please enter the month of the survey in the format MM: ",
            DatePart::Month,
            config,
        )?;
        let year = self.ask_date_part(
            "Please enter the year of the survey in the format YYYY: ",
            DatePart::Year,
            config,
        )?;
        SurveyDate::new(day, month, year, config)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))
    }

    /// Asks a Y/N question; `true` means yes.
    pub fn ask_continue(&mut self) -> io::Result<bool> {
        loop {
            let answer = self
                .ask("Do you want to analyze another dataset? (Y/N): ")?
                .to_uppercase();
            match answer.as_str() {
                "Y" => return Ok(true),
                "N" => return Ok(false),
                _ => self.say("Invalid input. Please enter 'Y' or 'N'.")?,
            }
        }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }
}
