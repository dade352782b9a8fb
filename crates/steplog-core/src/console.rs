//! Operator command surface
//!
//! Single-character, case-insensitive commands read from a line-oriented
//! console. Parsing is separated from dispatch so the sessions stay
//! testable without a real terminal.

/// How far one `+`/`-` keypress moves the setpoint
pub const SETPOINT_STEP_VOLTS: f64 = 0.1;

/// Help text for the step-response harness command set
pub const HELP: &str = "\
----------------------------------------
Commands:
  'g' - GO: start step response test
  'r' - RESET: setpoint back to 0 V
  's' - STOP/START logging
  'p' - PRINT log contents
  'c' - CLEAR log
  'i' - show log INFO
  'v' - show current VALUES
  '+' - increase setpoint by 0.1 V
  '-' - decrease setpoint by 0.1 V
  'h' - show this HELP
----------------------------------------";

/// A parsed operator command
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Dump the persisted log contents
    Dump,
    /// Truncate the log back to its header
    Clear,
    /// Report capacity/usage/sample-count info
    Info,
    /// Toggle sampling on or off
    Toggle,
    /// Start a step-response run
    StartRun,
    /// Return a step session to its post-startup state
    Reset,
    /// Print the current setpoint/sensor readings and flags
    Values,
    /// Move the setpoint by the given delta in volts
    Nudge(f64),
    /// Print the command help
    Help,
}

impl Command {
    /// Parse a single command character, case-insensitively. Unknown
    /// characters yield `None` and are ignored by the loop.
    pub fn parse(c: char) -> Option<Command> {
        match c.to_ascii_lowercase() {
            'p' => Some(Command::Dump),
            'c' => Some(Command::Clear),
            'i' => Some(Command::Info),
            's' => Some(Command::Toggle),
            'g' => Some(Command::StartRun),
            'r' => Some(Command::Reset),
            'v' => Some(Command::Values),
            '+' => Some(Command::Nudge(SETPOINT_STEP_VOLTS)),
            '-' => Some(Command::Nudge(-SETPOINT_STEP_VOLTS)),
            'h' | '?' => Some(Command::Help),
            _ => None,
        }
    }

    /// Parse the first non-whitespace character of an input line
    pub fn parse_line(line: &str) -> Option<Command> {
        Command::parse(line.trim().chars().next()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Command::parse('g'), Some(Command::StartRun));
        assert_eq!(Command::parse('G'), Some(Command::StartRun));
        assert_eq!(Command::parse('P'), Some(Command::Dump));
    }

    #[test]
    fn test_parse_nudge_signs() {
        assert_eq!(Command::parse('+'), Some(Command::Nudge(SETPOINT_STEP_VOLTS)));
        assert_eq!(Command::parse('-'), Some(Command::Nudge(-SETPOINT_STEP_VOLTS)));
    }

    #[test]
    fn test_unknown_characters_ignored() {
        assert_eq!(Command::parse('x'), None);
        assert_eq!(Command::parse('1'), None);
        assert_eq!(Command::parse(' '), None);
    }

    #[test]
    fn test_parse_line_takes_first_character() {
        assert_eq!(Command::parse_line("  v please"), Some(Command::Values));
        assert_eq!(Command::parse_line(""), None);
        assert_eq!(Command::parse_line("   "), None);
    }

    #[test]
    fn test_question_mark_is_help() {
        assert_eq!(Command::parse('?'), Some(Command::Help));
        assert_eq!(Command::parse('h'), Some(Command::Help));
    }
}
