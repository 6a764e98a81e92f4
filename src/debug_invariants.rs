use crate::mesh_error::MeshError;

/// Trait for validating data structure invariants.
pub trait DebugInvariants {
    /// Assert invariants in debug builds or when invariant checking is enabled.
    fn debug_assert_invariants(&self);
    /// Validate invariants and return the first error encountered.
    fn validate_invariants(&self) -> Result<(), MeshError>;
}

/// Helper macro to run a fallible check and panic on error when invariant
/// checking is enabled.
#[macro_export]
macro_rules! debug_invariants {
    ($expr:expr, $($ctx:tt)*) => {
        #[cfg(any(debug_assertions, feature = "strict-invariants", feature = "check-invariants"))]
        if let Err(e) = $expr {
            panic!(concat!("[invariants] ", $($ctx)*, ": {}"), e);
        }
    };
}

/// Precondition check for accessor and iterator operations.
///
/// Panics with the formatted [`MeshError`] when the condition is false. Active
/// in debug builds and with the `strict-invariants` feature; compiles to
/// nothing otherwise.
#[macro_export]
macro_rules! precondition {
    ($cond:expr, $err:expr) => {
        #[cfg(any(debug_assertions, feature = "strict-invariants"))]
        if !$cond {
            panic!("[precondition] {}", $err);
        }
    };
}

/// Structural-consistency check (unused child or neighbor handed out).
///
/// Same switch as [`debug_invariants!`]: these only catch bugs in refinement
/// execution and may be compiled out.
#[macro_export]
macro_rules! structure_check {
    ($cond:expr, $err:expr) => {
        #[cfg(any(debug_assertions, feature = "strict-invariants", feature = "check-invariants"))]
        if !$cond {
            panic!("[invariants] {}", $err);
        }
    };
}
