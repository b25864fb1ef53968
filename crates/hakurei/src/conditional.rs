//! Conditional branch tracking for one render pass.
//!
//! Each open `@if` chain is one [`Branch`] on the stack. A branch records
//! whether its current arm is active and whether any arm of the chain has
//! been taken yet, which is all `@elseif` and `@else` need to know:
//!
//! ```text
//! @if a        push { active: a, taken: a }
//! @elseif b    taken ? inactive : { active: b, taken: b }
//! @else        { active: !taken, taken: true }
//! @endif       pop
//! ```
//!
//! Text is emitted only when every branch on the stack is active, so an
//! inactive outer chain silences everything nested inside it.
//!
//! Templates are balanced by the time they render (see `check_balance` in
//! the template module), so a directive with no open chain is ignored here.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Branch {
    active: bool,
    taken: bool,
}

/// Stack of open conditional chains.
#[derive(Debug, Default)]
pub(crate) struct BranchStack {
    branches: Vec<Branch>,
}

impl BranchStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when output is currently allowed.
    pub fn is_active(&self) -> bool {
        self.branches.iter().all(|b| b.active)
    }

    pub fn depth(&self) -> usize {
        self.branches.len()
    }

    /// Opens a chain with the result of its `@if` condition.
    pub fn open(&mut self, condition: bool, line: usize) {
        tracing::trace!(condition, line, depth = self.depth(), "@if");
        self.branches.push(Branch {
            active: condition,
            taken: condition,
        });
    }

    /// Moves to an `@elseif` arm.
    ///
    /// `condition` is only called when no earlier arm of the chain was taken.
    pub fn elseif(&mut self, line: usize, condition: impl FnOnce() -> bool) {
        let Some(branch) = self.branches.last_mut() else {
            return;
        };
        if branch.taken {
            branch.active = false;
        } else {
            branch.active = condition();
            branch.taken = branch.active;
        }
        tracing::trace!(active = branch.active, line, "@elseif");
    }

    /// Moves to the `@else` arm.
    pub fn otherwise(&mut self, line: usize) {
        let Some(branch) = self.branches.last_mut() else {
            return;
        };
        branch.active = !branch.taken;
        branch.taken = true;
        tracing::trace!(active = branch.active, line, "@else");
    }

    /// Closes the innermost chain.
    pub fn close(&mut self, line: usize) {
        self.branches.pop();
        tracing::trace!(line, depth = self.depth(), "@endif");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stack_is_active() {
        let stack = BranchStack::new();
        assert!(stack.is_active());
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn if_else_chain() {
        let mut stack = BranchStack::new();
        stack.open(false, 1);
        assert!(!stack.is_active());
        stack.otherwise(3);
        assert!(stack.is_active());
        stack.close(5);
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn taken_chain_skips_elseif_condition() {
        let mut stack = BranchStack::new();
        stack.open(true, 1);

        let mut evaluated = false;
        stack.elseif(2, || {
            evaluated = true;
            true
        });
        assert!(!evaluated);
        assert!(!stack.is_active());

        stack.otherwise(3);
        assert!(!stack.is_active());
        stack.close(4);
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn elseif_after_false_branch() {
        let mut stack = BranchStack::new();
        stack.open(false, 1);
        stack.elseif(2, || false);
        assert!(!stack.is_active());
        stack.elseif(3, || true);
        assert!(stack.is_active());
        stack.elseif(4, || true);
        assert!(!stack.is_active());
        stack.otherwise(5);
        assert!(!stack.is_active());
    }

    #[test]
    fn outer_false_dominates() {
        let mut stack = BranchStack::new();
        stack.open(false, 1);
        stack.open(true, 2);
        assert!(!stack.is_active());
        stack.close(3);
        stack.otherwise(4);
        assert!(stack.is_active());
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn stray_directives_leave_stack_empty() {
        let mut stack = BranchStack::new();
        stack.close(7);
        stack.otherwise(2);
        stack.elseif(3, || true);
        assert_eq!(stack.depth(), 0);
        assert!(stack.is_active());
    }
}
