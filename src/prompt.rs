//! Interactive collection of filter selections and yes/no answers.
//!
//! Every question repeats until it gets a valid answer. End of input ends the
//! session: the asking method returns `Ok(None)`.

use std::io::{BufRead, Write};

use anyhow::Result;
use tracing::debug;

use crate::calendar::{DayOfWeek, FilterMonth};
use crate::city::City;
use crate::filter::{FilterMode, FilterSpec, parse_selection};

const CITY_QUESTION: &str = "Would you like to see data from Chicago, New York City, or Washington?";
const MODE_QUESTION: &str =
    "Would you like to filter the data by month, day or both?\nEnter month, day or both.";
const MONTH_QUESTION: &str =
    "Enter the month you would like to check:\nall, january, february, march, april, may, june";
const DAY_QUESTION: &str = "Enter the day you would like to check:\nall, monday, tuesday, wednesday, thursday, friday, saturday, sunday";

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Writes free text to the prompt's output.
    pub fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{text}")?;
        Ok(())
    }

    /// Asks once and returns the trimmed answer, or `None` at end of input.
    pub fn ask(&mut self, question: &str) -> Result<Option<String>> {
        writeln!(self.output, "{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Asks until `parse` accepts the answer.
    fn ask_until<T>(
        &mut self,
        question: &str,
        retry: &str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<Option<T>> {
        loop {
            let Some(answer) = self.ask(question)? else {
                return Ok(None);
            };
            match parse(&answer) {
                Some(value) => return Ok(Some(value)),
                None => {
                    debug!(answer = %answer, "Rejected prompt answer");
                    writeln!(self.output, "\n{retry}")?;
                }
            }
        }
    }

    /// Collects city, mode and the month/day selections the mode needs.
    pub fn choose_filters(&mut self) -> Result<Option<FilterSpec>> {
        self.say("Hello! Let's explore some US bikeshare data!\n")?;

        let Some(city) = self.ask_until(CITY_QUESTION, "Please enter a valid city!", |s| {
            s.parse::<City>().ok()
        })?
        else {
            return Ok(None);
        };
        self.say(&format!("You would like to look at the data from {city}!\n"))?;

        let Some(mode) = self.ask_until(MODE_QUESTION, "Please provide valid input", |s| {
            s.parse::<FilterMode>()
                .ok()
                .filter(|m| *m != FilterMode::None)
        })?
        else {
            return Ok(None);
        };

        let mut month = None;
        if mode.constrains_month() {
            let Some(choice) = self.ask_until(MONTH_QUESTION, "Please enter a valid month!", |s| {
                parse_selection::<FilterMonth>(s).ok()
            })?
            else {
                return Ok(None);
            };
            month = choice;
        }

        let mut day = None;
        if mode.constrains_day() {
            let Some(choice) = self.ask_until(DAY_QUESTION, "Please enter a valid day!", |s| {
                parse_selection::<DayOfWeek>(s).ok()
            })?
            else {
                return Ok(None);
            };
            day = choice;
        }

        let spec = FilterSpec::new(city, mode, month, day);
        self.say(&format!("Filtering {spec}"))?;
        self.say(&"-".repeat(40))?;
        Ok(Some(spec))
    }

    /// Asks a y/n question until answered.
    pub fn confirm(&mut self, question: &str) -> Result<Option<bool>> {
        self.ask_until(question, "Please enter y/n!", |s| {
            match s.to_ascii_lowercase().as_str() {
                "y" | "yes" => Some(true),
                "n" | "no" => Some(false),
                _ => None,
            }
        })
    }

    /// Only an explicit `yes` restarts.
    pub fn restart(&mut self) -> Result<bool> {
        let answer = self.ask("\nWould you like to restart? Enter yes or no.")?;
        Ok(answer.is_some_and(|a| a.eq_ignore_ascii_case("yes")))
    }
}
