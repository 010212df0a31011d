// Resource limits for a decision (spec §5): a DFA state cap for the
// regex adapter and an optional wall-clock deadline. Both are opt-in --
// the engine itself is pure and unconfigured by default.

use std::time::Instant;

/// Tuning knobs threaded through `is_subschema_with_options`.
#[derive(Debug, Clone)]
pub struct DecisionOptions {
    /// Ceiling on states explored by any single product-automaton search
    /// or cycle check in the regex adapter. Exceeding it raises
    /// `SchemaError::RegexUnsupported` rather than hanging.
    pub dfa_state_cap: usize,
    /// If set, the decision returns `SchemaError::Undecided` once this
    /// instant passes, checked at the top of the candidate-heavy loops
    /// (object key enumeration, regex product-automaton BFS).
    pub deadline: Option<Instant>,
}

impl Default for DecisionOptions {
    fn default() -> Self {
        DecisionOptions {
            dfa_state_cap: 1 << 16,
            deadline: None,
        }
    }
}

impl DecisionOptions {
    /// `Err(Undecided)` if `deadline` has passed, else `Ok(())`.
    pub fn check_deadline(&self) -> crate::error::Result<()> {
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(crate::error::SchemaError::Undecided);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn default_cap_matches_spec_default() {
        assert_eq!(DecisionOptions::default().dfa_state_cap, 1 << 16);
    }

    #[test]
    fn expired_deadline_is_undecided() {
        let opts = DecisionOptions {
            deadline: Some(Instant::now() - Duration::from_secs(1)),
            ..Default::default()
        };
        assert!(matches!(
            opts.check_deadline(),
            Err(crate::error::SchemaError::Undecided)
        ));
    }

    #[test]
    fn no_deadline_never_expires() {
        assert!(DecisionOptions::default().check_deadline().is_ok());
    }
}
