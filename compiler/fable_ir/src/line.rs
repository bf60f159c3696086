use std::fmt;

/// A 1-based source line number.
///
/// The only source coordinate the runtime tracks; every token, node, and
/// diagnostic carries one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Line(u32);

impl Line {
    pub const fn new(line: u32) -> Self {
        Line(line)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    /// Advance by one physical line (newline inside a string literal or
    /// between tokens).
    #[must_use]
    pub const fn next(self) -> Self {
        Line(self.0 + 1)
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_display_is_bare_number() {
        assert_eq!(Line::new(7).to_string(), "7");
    }

    #[test]
    fn line_next_advances() {
        assert_eq!(Line::new(1).next(), Line::new(2));
    }
}
