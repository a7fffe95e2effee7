//! Common types shared by the engine and the harness.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a philosopher, 1-based as printed in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhilosopherId(usize);

impl PhilosopherId {
    /// Creates an id from its printed (1-based) value.
    pub const fn new(id: usize) -> Self {
        Self(id)
    }
    
    /// Creates the id of the philosopher seated at a 0-based position.
    pub const fn from_position(position: usize) -> Self {
        Self(position + 1)
    }
    
    /// Returns the printed value.
    pub const fn get(self) -> usize {
        self.0
    }
    
    /// Returns the 0-based seat of this philosopher.
    pub const fn position(self) -> usize {
        self.0.saturating_sub(1)
    }
    
    /// Odd identities pick up their forks in the opposite order to even ones.
    pub const fn is_odd(self) -> bool {
        self.0 % 2 == 1
    }
}

impl fmt::Display for PhilosopherId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Events a philosopher goes through, in loop order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    TakeFirstFork,
    TakeSecondFork,
    Eating,
    Sleeping,
    Thinking,
    Died,
}

impl Status {
    /// Returns the text printed after the philosopher id.
    pub fn text(&self) -> &'static str {
        match self {
            Status::TakeFirstFork | Status::TakeSecondFork => "has taken a fork",
            Status::Eating => "is eating",
            Status::Sleeping => "is sleeping",
            Status::Thinking => "is thinking",
            Status::Died => "died",
        }
    }
    
    /// Returns true for either fork pickup.
    pub fn is_fork(&self) -> bool {
        matches!(self, Status::TakeFirstFork | Status::TakeSecondFork)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// One line of simulation output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusLine {
    /// Milliseconds since the simulation start, taken under the output lock
    pub elapsed_ms: u64,
    
    /// Who the event is about
    pub philosopher: PhilosopherId,
    
    /// What happened
    pub status: Status,
}

impl StatusLine {
    /// Creates a new status line.
    pub fn new(elapsed_ms: u64, philosopher: PhilosopherId, status: Status) -> Self {
        Self {
            elapsed_ms,
            philosopher,
            status,
        }
    }
}

impl fmt::Display for StatusLine {
    /// Formats as `<elapsed_ms> <id> <text>`, elapsed left-justified in six columns.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<6} {} {}", self.elapsed_ms, self.philosopher, self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_status_line_format() {
        let line = StatusLine::new(200, PhilosopherId::new(3), Status::Eating);
        assert_eq!(line.to_string(), "200    3 is eating");
        
        let wide = StatusLine::new(1234567, PhilosopherId::new(12), Status::Died);
        assert_eq!(wide.to_string(), "1234567 12 died");
    }
    
    #[test]
    fn test_both_forks_print_the_same_text() {
        assert_eq!(Status::TakeFirstFork.text(), "has taken a fork");
        assert_eq!(Status::TakeSecondFork.text(), Status::TakeFirstFork.text());
        assert!(Status::TakeSecondFork.is_fork());
        assert!(!Status::Eating.is_fork());
    }
    
    #[test]
    fn test_philosopher_id_positions() {
        let id = PhilosopherId::from_position(0);
        assert_eq!(id.get(), 1);
        assert_eq!(id.position(), 0);
        assert!(id.is_odd());
        assert!(!PhilosopherId::new(4).is_odd());
    }
}
