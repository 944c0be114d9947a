//! Elixir Term Conversion Utilities
//!
//! Converts detection results to Elixir terms.

use rustler::{Atom, Encoder, Env, Term};

use crate::error::DetectError;
use crate::mode::ValidationMode;

// Pre-defined atoms for efficiency - created once at compile time
rustler::atoms! {
    ok,
    error,
    none,
    auto,
    dtd,
    xsd,
    pending,
}

/// Atom for a validation mode (`:none`, `:auto`, `:dtd`, `:xsd`)
pub fn mode_atom(mode: ValidationMode) -> Atom {
    match mode {
        ValidationMode::None => none(),
        ValidationMode::Auto => auto(),
        ValidationMode::Dtd => dtd(),
        ValidationMode::Xsd => xsd(),
    }
}

/// `mode` for a decision, `:pending` otherwise
pub fn decision_to_term(env: Env<'_>, decision: Option<ValidationMode>) -> Term<'_> {
    match decision {
        Some(mode) => mode_atom(mode).encode(env),
        None => pending().encode(env),
    }
}

/// `{:ok, mode}` or `{:error, reason}`
pub fn result_to_term(env: Env<'_>, result: Result<ValidationMode, DetectError>) -> Term<'_> {
    match result {
        Ok(mode) => (ok(), mode_atom(mode)).encode(env),
        Err(e) => (error(), e.to_string()).encode(env),
    }
}
