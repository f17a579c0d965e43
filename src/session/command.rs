//! Command-loop vocabulary.

use crate::error::CommandError;

/// A recognized command-loop input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `GC`: request memory reclamation now.
    Collect,
    /// Empty line: start another job.
    StartJob,
    /// `Q`: leave the loop.
    Quit,
}

impl Command {
    /// Parses one input line, ignoring its line ending and ASCII case.
    ///
    /// The match is against the whole line; surrounding whitespace is
    /// significant.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::UnknownCommand`] for anything else.
    ///
    /// # Examples
    ///
    /// ```
    /// use bytefreq::session::Command;
    ///
    /// assert_eq!(Command::parse("gc\n").unwrap(), Command::Collect);
    /// assert_eq!(Command::parse("").unwrap(), Command::StartJob);
    /// assert!(Command::parse("help").is_err());
    /// ```
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = strip_line_ending(line);
        if line.is_empty() {
            Ok(Self::StartJob)
        } else if line.eq_ignore_ascii_case("gc") {
            Ok(Self::Collect)
        } else if line.eq_ignore_ascii_case("q") {
            Ok(Self::Quit)
        } else {
            Err(CommandError::UnknownCommand(line.to_string()))
        }
    }
}

/// Removes one trailing `\n` or `\r\n`.
#[must_use]
pub fn strip_line_ending(line: &str) -> &str {
    line.strip_suffix('\n')
        .map_or(line, |l| l.strip_suffix('\r').unwrap_or(l))
}
