use tokio::sync::watch;

use crate::common::Result;
use crate::core::middleware::{Authorizer, Dispatcher, Logger, Middleware};
use crate::core::{SessionState, UnitOfWork};

pub(crate) struct MiddlewareChain {
    root: Logger<Authorizer<Dispatcher>>,
}

impl MiddlewareChain {
    pub(crate) fn new(state: watch::Receiver<SessionState>, dispatcher: Dispatcher) -> Self {
        let authorizer = Authorizer::new(state.clone(), dispatcher);

        let logger = Logger::new(state, authorizer);

        Self { root: logger }
    }

    pub(crate) async fn apply(&mut self, uow: UnitOfWork) -> Result<()> {
        self.root.apply(uow).await
    }
}
