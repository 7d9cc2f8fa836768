//! Load state of a data-backed view.

use super::Error;

/// Tagged load state; replaces loose `loading`/`error`/`data` flags.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewState<T> {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A request is in flight.
    Loading,
    /// The latest request succeeded.
    Loaded(T),
    /// The latest request failed.
    Failed(Error),
}

impl<T> ViewState<T> {
    /// State reached once a request completes.
    pub fn from_result(result: Result<T, Error>) -> Self {
        match result {
            Ok(value) => Self::Loaded(value),
            Err(err) => Self::Failed(err),
        }
    }

    /// Whether a request is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Loaded value, if any.
    #[must_use]
    pub const fn loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(value) => Some(value),
            _ => None,
        }
    }

    /// Failure, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&Error> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn results_map_onto_states() {
        let ok: ViewState<u8> = ViewState::from_result(Ok(3));
        assert_eq!(ok.loaded(), Some(&3));

        let failed: ViewState<u8> = ViewState::from_result(Err(Error::service_unavailable("down")));
        assert!(failed.loaded().is_none());
        assert_eq!(failed.error().map(Error::message), Some("down"));
    }

    #[rstest]
    fn default_is_idle() {
        let state: ViewState<()> = ViewState::default();
        assert_eq!(state, ViewState::Idle);
        assert!(!state.is_loading());
    }
}
