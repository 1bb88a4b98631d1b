use crate::language::SAMPLE_LIMIT;

/// What happens when a rule reports a violation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViolationPolicy {
    /// Stop evaluating the batch and return the violation as the error.
    #[default]
    Halt,
    /// Record the violation alongside the other diagnostics and keep going.
    Accumulate,
}

/// Per-invocation knobs for [`lint`](crate::lint).
#[derive(Debug, Clone)]
pub struct LintConfig {
    pub policy: ViolationPolicy,
    /// Bytes read for language sniffing; capped at [`SAMPLE_LIMIT`].
    pub sample_len: usize,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            policy: ViolationPolicy::default(),
            sample_len: SAMPLE_LIMIT,
        }
    }
}
