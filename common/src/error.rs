// SPDX-FileCopyrightText: 2025 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error reported by the platform notification APIs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeError {
    pub code: i64,
    pub domain: String,
    pub localized_description: String,
}

impl NativeError {
    pub fn new(
        code: i64,
        domain: impl Into<String>,
        localized_description: impl Into<String>,
    ) -> Self {
        Self {
            code,
            domain: domain.into(),
            localized_description: localized_description.into(),
        }
    }
}

impl fmt::Display for NativeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): {}",
            self.domain, self.code, self.localized_description
        )
    }
}

impl std::error::Error for NativeError {}

/// Error value sent back over the channel as the result of a failed command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorTriple {
    pub code: String,
    pub message: String,
    pub details: String,
}

impl From<NativeError> for ErrorTriple {
    fn from(error: NativeError) -> Self {
        Self {
            code: format!("Error: {}", error.code),
            message: error.domain,
            details: error.localized_description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_error_into_triple() {
        let error = NativeError::new(1, "UNErrorDomain", "Notifications are not allowed");
        assert_eq!(
            ErrorTriple::from(error),
            ErrorTriple {
                code: "Error: 1".to_owned(),
                message: "UNErrorDomain".to_owned(),
                details: "Notifications are not allowed".to_owned(),
            }
        );
    }
}
