use crate::constants::cors::{DEFAULT_METHODS, VALUE_SEPARATOR};
use crate::result::CorsError;
use std::ops::Deref;

/// Validated, ordered methods for the `Access-Control-Allow-Methods` header.
///
/// Order and case are kept as configured. An empty list is valid and falls
/// back to [`DEFAULT_METHODS`] when rendered.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AllowedMethods {
    values: Vec<String>,
}

impl AllowedMethods {
    /// Builds the list, rejecting the first empty entry with
    /// [`CorsError::EmptyAllowedMethod`].
    pub fn list<I, S>(values: I) -> Result<Self, CorsError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values
            .into_iter()
            .map(Into::into)
            .enumerate()
            .map(|(index, value)| {
                if value.is_empty() {
                    Err(CorsError::EmptyAllowedMethod { index })
                } else {
                    Ok(value)
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { values })
    }

    /// Configured methods, or the defaults when none were configured.
    pub fn effective(&self) -> Vec<String> {
        if self.values.is_empty() {
            DEFAULT_METHODS.iter().map(|method| method.to_string()).collect()
        } else {
            self.values.clone()
        }
    }

    pub fn header_value(&self) -> String {
        self.effective().join(VALUE_SEPARATOR)
    }

    pub fn into_inner(self) -> Vec<String> {
        self.values
    }
}

impl Deref for AllowedMethods {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.values
    }
}

#[cfg(test)]
#[path = "allowed_methods_test.rs"]
mod allowed_methods_test;
