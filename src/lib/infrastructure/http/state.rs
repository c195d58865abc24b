//! Application state module

use std::{fmt, sync::Arc};

use chrono::{DateTime, Utc};

use crate::domain::{delivery::Dispatcher, replies::ReplyComposer};

/// Global application state
#[derive(Clone)]
pub struct AppState<C: ReplyComposer, D: Dispatcher> {
    /// The time the server started
    pub start_time: DateTime<Utc>,

    /// Reply composer
    pub composer: Arc<C>,

    /// Reply dispatcher
    pub dispatcher: Arc<D>,
}

impl<C, D> AppState<C, D>
where
    C: ReplyComposer,
    D: Dispatcher,
{
    /// Create a new application state
    pub fn new(composer: C, dispatcher: D) -> Self {
        Self {
            start_time: Utc::now(),
            composer: Arc::new(composer),
            dispatcher: Arc::new(dispatcher),
        }
    }
}

impl<C, D> fmt::Debug for AppState<C, D>
where
    C: ReplyComposer,
    D: Dispatcher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("start_time", &self.start_time)
            .field("composer", &"ReplyComposer")
            .field("dispatcher", &"Dispatcher")
            .finish()
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::domain::{delivery::tests::MockDispatcher, replies::tests::MockReplyComposer};

    pub fn test_state(
        composer: Option<MockReplyComposer>,
        dispatcher: Option<MockDispatcher>,
    ) -> AppState<MockReplyComposer, MockDispatcher> {
        AppState::new(
            composer.unwrap_or_else(MockReplyComposer::new),
            dispatcher.unwrap_or_else(MockDispatcher::new),
        )
    }
}
