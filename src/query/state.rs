//! Loading / error / success states handed to views.

use crate::error::{DashboardError, Result};

/// Outcome of a cached query, as a view sees it.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState<T> {
    /// The query's required input is missing; nothing was fetched.
    Disabled,
    Loading,
    /// The fetch failed; holds the error text.
    Error(String),
    Success(T),
}

impl<T> QueryState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self, Self::Disabled)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            Self::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> QueryState<U> {
        match self {
            Self::Disabled => QueryState::Disabled,
            Self::Loading => QueryState::Loading,
            Self::Error(message) => QueryState::Error(message),
            Self::Success(data) => QueryState::Success(f(data)),
        }
    }

    /// Back to a `Result`; `Disabled` and `Loading` count as config errors.
    pub fn into_result(self) -> Result<T> {
        match self {
            Self::Success(data) => Ok(data),
            Self::Error(message) => Err(DashboardError::network_error(message)),
            Self::Disabled => Err(DashboardError::config_error("query is disabled")),
            Self::Loading => Err(DashboardError::config_error("query is still loading")),
        }
    }
}

impl<T> From<Result<T>> for QueryState<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => Self::Success(data),
            Err(e) => Self::Error(e.to_string()),
        }
    }
}
