//! Parse context flags for context-sensitive grammar rules.
//!
//! `return` statements are only legal inside a function literal, and the
//! `index` keyword only where the runtime provides a loop counter. Flags are
//! threaded through the recursive descent as a value, never stored globally.

/// Context flags for parsing. Combine with [`ParseContext::with`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParseContext(u16);

impl ParseContext {
    /// No special context (top level of a program).
    pub const NONE: Self = Self(0);

    /// Inside a function literal body. Makes `<-` and `..` statements valid.
    pub const IN_FUNCTION: Self = Self(1 << 0);

    /// Inside a construct whose runtime supplies the loop counter.
    /// Makes the `index` keyword valid.
    pub const IN_LOOP: Self = Self(1 << 1);

    #[inline]
    pub const fn new() -> Self {
        Self::NONE
    }

    /// Check if a flag is set.
    #[inline]
    pub const fn has(self, flag: Self) -> bool {
        (self.0 & flag.0) != 0
    }

    /// Add a flag to the context.
    #[inline]
    #[must_use]
    pub const fn with(self, flag: Self) -> Self {
        Self(self.0 | flag.0)
    }

    #[inline]
    pub const fn in_function(self) -> bool {
        self.has(Self::IN_FUNCTION)
    }

    #[inline]
    pub const fn in_loop(self) -> bool {
        self.has(Self::IN_LOOP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_combine_and_query() {
        let ctx = ParseContext::NONE.with(ParseContext::IN_FUNCTION);
        assert!(ctx.in_function());
        assert!(!ctx.in_loop());

        let ctx = ctx.with(ParseContext::IN_LOOP);
        assert!(ctx.in_function());
        assert!(ctx.in_loop());
    }

    #[test]
    fn function_context_preserves_loop_flag() {
        // A function literal nested inside a loop position keeps IN_LOOP:
        // the loop frame is still live when its body runs.
        let ctx = ParseContext::NONE
            .with(ParseContext::IN_LOOP)
            .with(ParseContext::IN_FUNCTION);
        assert!(ctx.in_loop());
    }
}
