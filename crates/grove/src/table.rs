// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Table-driven specs: one container, one spec per entry.

use std::sync::Arc;

use crate::code_location::CodeLocation;
use crate::leaf::Body;
use crate::suite::Suite;
use crate::types::FlagType;

/// One row of a table.
pub struct Entry<P> {
    description: String,
    parameters: P,
    flag: FlagType,
    code_location: CodeLocation,
}

impl<P> Entry<P> {
    #[track_caller]
    pub fn new(description: impl Into<String>, parameters: P) -> Self {
        Self::with_flag(description.into(), parameters, FlagType::None)
    }

    #[track_caller]
    pub fn focused(description: impl Into<String>, parameters: P) -> Self {
        Self::with_flag(description.into(), parameters, FlagType::Focused)
    }

    #[track_caller]
    pub fn pending(description: impl Into<String>, parameters: P) -> Self {
        Self::with_flag(description.into(), parameters, FlagType::Pending)
    }

    #[track_caller]
    fn with_flag(description: String, parameters: P, flag: FlagType) -> Self {
        Self {
            description,
            parameters,
            flag,
            code_location: CodeLocation::caller(),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn flag(&self) -> FlagType {
        self.flag
    }
}

impl Suite {
    /// A container named `text` holding one spec per entry; each spec calls
    /// `body` with its entry's parameters. Pending entries never call it.
    ///
    /// # Panics
    ///
    /// Panics when `entries` is empty.
    #[track_caller]
    #[allow(clippy::panic)]
    pub fn describe_table<P>(
        &mut self,
        text: impl Into<String>,
        body: impl Fn(&P) + Send + Sync + 'static,
        entries: Vec<Entry<P>>,
    ) where
        P: Send + Sync + 'static,
    {
        let code_location = CodeLocation::caller();
        let text: String = text.into();
        if entries.is_empty() {
            panic!("table '{text}' at {code_location} has no entries");
        }

        let body = Arc::new(body);
        self.container(text, FlagType::None, code_location, move |suite| {
            for entry in entries {
                let spec_body = if entry.flag == FlagType::Pending {
                    Body::sync(|| {})
                } else {
                    let body = Arc::clone(&body);
                    let parameters = entry.parameters;
                    Body::sync(move || body(&parameters))
                };
                suite.subject(entry.description, spec_body, entry.flag, entry.code_location);
            }
        });
    }
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
