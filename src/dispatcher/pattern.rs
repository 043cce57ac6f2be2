//! Matching of command invocations.
//!
//! This module provides the [`CommandPattern`], a single regular expression
//! recognizing `<trigger><name><separator><arguments>` for a set of names.

use log::debug;
use regex::Regex;
use thiserror::Error;

/// Errors that can occur while building a [`CommandPattern`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatternError {
    /// The trigger is empty, every message would be a candidate.
    #[error("the command trigger is empty")]
    EmptyTrigger,

    /// There is no command nor alias to match.
    #[error("no command or alias to match")]
    NoNames,

    /// The regular expression could not be compiled.
    #[error("invalid command pattern: {0}")]
    Invalid(String),
}

/// Regular expression matching the invocation of any known name.
///
/// Names are escaped and tried longest first, so that a name which is a
/// prefix of another (`on` and `online`) never steals its match. A name must
/// be followed by one whitespace character or the end of the text: `!infos`
/// does not invoke `info`.
#[derive(Debug, Clone)]
pub struct CommandPattern {
    regex: Regex,
}

impl CommandPattern {
    /// Builds the pattern for `names` introduced by `trigger`.
    ///
    /// Empty and duplicated names are skipped.
    ///
    /// # Errors
    ///
    /// - [`PatternError::EmptyTrigger`] - `trigger` is empty
    /// - [`PatternError::NoNames`] - there is no name left to match
    /// - [`PatternError::Invalid`] - the expression exceeds the regex limits
    ///
    /// # Examples
    ///
    /// ```ignore
    /// use crate::dispatcher::CommandPattern;
    ///
    /// let pattern = CommandPattern::build("!", ["info", "online"]).unwrap();
    /// assert_eq!(pattern.captures("!info 1.2.3.4"), Some(("info", "1.2.3.4")));
    /// assert_eq!(pattern.captures("hello"), None);
    /// ```
    pub fn build<'a>(
        trigger: &str,
        names: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, PatternError> {
        if trigger.is_empty() {
            return Err(PatternError::EmptyTrigger);
        }

        let mut names: Vec<&str> = names.into_iter().filter(|name| !name.is_empty()).collect();
        if names.is_empty() {
            return Err(PatternError::NoNames);
        }

        // Longest first, then alphabetical to keep the expression stable
        names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        names.dedup();

        let alternatives = names
            .iter()
            .map(|name| regex::escape(name))
            .collect::<Vec<_>>()
            .join("|");
        let expression = format!(r"(?s)^{}({})(?:\s|$)(.*)$", regex::escape(trigger), alternatives);
        debug!("command pattern {}", expression);

        let regex = Regex::new(&expression).map_err(|e| PatternError::Invalid(e.to_string()))?;

        Ok(CommandPattern { regex })
    }

    /// Matches `text` against the pattern.
    ///
    /// # Returns
    ///
    /// * `Some((name, arguments))` - The invoked name and the text following its separator
    /// * `None` - The text is not an invocation of a known name
    pub fn captures<'t>(&self, text: &'t str) -> Option<(&'t str, &'t str)> {
        let captures = self.regex.captures(text)?;
        let name = captures.get(1)?.as_str();
        let arguments = captures.get(2).map_or("", |m| m.as_str());

        Some((name, arguments))
    }
}
