//! Error-chain helpers shared by the HTTP callers

use std::error::Error as StdError;

/// Flatten an error and its sources into one line
pub fn error_chain_text(error: &(dyn StdError + 'static)) -> String {
    let mut parts = vec![error.to_string()];
    let mut current = error.source();
    while let Some(err) = current {
        parts.push(err.to_string());
        current = err.source();
    }
    parts.join(": ")
}

/// True if the message of any error in the source chain satisfies `predicate`
pub fn chain_any(error: &(dyn StdError + 'static), predicate: impl Fn(&str) -> bool) -> bool {
    let mut current: Option<&(dyn StdError + 'static)> = Some(error);
    while let Some(err) = current {
        if predicate(&err.to_string()) {
            return true;
        }
        current = err.source();
    }
    false
}
