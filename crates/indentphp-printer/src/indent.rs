/// Nesting depth plus the string emitted once per level.
///
/// One context is created per formatted file and threaded through the
/// printer by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndentContext {
    unit: String,
    depth: usize,
}

impl IndentContext {
    pub const DEFAULT_UNIT: &'static str = "    ";

    pub fn new() -> Self {
        Self::with_unit(Self::DEFAULT_UNIT)
    }

    pub fn with_unit(unit: impl Into<String>) -> Self {
        Self {
            unit: unit.into(),
            depth: 0,
        }
    }

    /// The unit repeated `depth` times.
    pub fn indent(&self) -> String {
        self.unit.repeat(self.depth)
    }

    pub fn push(&mut self) {
        self.depth += 1;
    }

    /// Leave one nesting level. Unbalanced pops are a printer bug; in release
    /// builds the depth saturates at zero.
    pub fn pop(&mut self) {
        debug_assert!(self.depth > 0, "unbalanced IndentContext::pop");
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl Default for IndentContext {
    fn default() -> Self {
        Self::new()
    }
}
