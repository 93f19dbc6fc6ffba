//! Scoped floating-point error policy.
//!
//! Division during renormalization is expected to hit `0 / 0` for
//! destination cells without source coverage. Instead of a process-wide
//! error mode, the policy lives in a thread-local that is changed through
//! [`InvalidValueGuard`], which restores the previous policy when dropped,
//! including during unwinding.

use std::cell::Cell;

use ndarray::{ArrayD, ArrayViewD, Zip};

/// What to do when an arithmetic operation produces an invalid value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvalidValuePolicy {
    /// Log a warning.
    #[default]
    Warn,
    /// Stay silent.
    Ignore,
}

thread_local! {
    static INVALID_POLICY: Cell<InvalidValuePolicy> = const { Cell::new(InvalidValuePolicy::Warn) };
}

/// The policy currently active on this thread.
pub fn invalid_value_policy() -> InvalidValuePolicy {
    INVALID_POLICY.with(|p| p.get())
}

/// Sets the invalid-value policy until dropped.
#[must_use = "the policy is restored as soon as the guard is dropped"]
#[derive(Debug)]
pub struct InvalidValueGuard {
    previous: InvalidValuePolicy,
}

impl InvalidValueGuard {
    pub fn new(policy: InvalidValuePolicy) -> Self {
        let previous = INVALID_POLICY.with(|p| p.replace(policy));
        Self { previous }
    }

    /// Shorthand for `InvalidValueGuard::new(InvalidValuePolicy::Ignore)`.
    pub fn ignore() -> Self {
        Self::new(InvalidValuePolicy::Ignore)
    }
}

impl Drop for InvalidValueGuard {
    fn drop(&mut self) {
        INVALID_POLICY.with(|p| p.set(self.previous));
    }
}

/// Elementwise `num / den` for arrays of equal shape.
///
/// Results that are NaN although both operands were not NaN (`0 / 0`,
/// `inf / inf`) count as invalid and are reported once per call unless the
/// policy is [`InvalidValuePolicy::Ignore`].
pub fn checked_divide(num: ArrayViewD<f64>, den: ArrayViewD<f64>) -> ArrayD<f64> {
    let mut invalid = 0usize;
    let out = Zip::from(&num).and(&den).map_collect(|&n, &d| {
        let q = n / d;
        if q.is_nan() && !n.is_nan() && !d.is_nan() {
            invalid += 1;
        }
        q
    });

    if invalid > 0 && invalid_value_policy() == InvalidValuePolicy::Warn {
        tracing::warn!(count = invalid, "invalid value encountered in divide");
    }
    out
}
