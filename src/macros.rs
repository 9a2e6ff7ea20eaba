//! This module contains the macros used in the project.

/// unwrap a `Result` or return early with a failed `FetchOutcome`
macro_rules! outcome_try {
    ($expr:expr, $subject:expr) => {
        match $expr {
            Ok(value) => value,
            Err(e) => {
                log::warn!("{}: {}", $subject, e);
                return $crate::platform::FetchOutcome::Failed {
                    reason: e.to_string(),
                };
            }
        }
    };
}

pub(crate) use outcome_try;
