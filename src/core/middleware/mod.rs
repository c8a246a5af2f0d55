mod chain;
pub(crate) use self::chain::MiddlewareChain;

mod middleware;
pub(crate) use self::middleware::Middleware;

mod authorizer;
pub(crate) use self::authorizer::Authorizer;

mod logger;
pub(crate) use self::logger::Logger;

mod dispatcher;
pub(crate) use self::dispatcher::Dispatcher;
