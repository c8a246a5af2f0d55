//! Session bootstrap.
//!
//! The session lives in one task ([`Session`]) that consumes units of work
//! through a middleware chain. [`SessionHandle`] is the cloneable front end.

mod session;
pub use self::session::{Builder, Session, SessionHandle};

mod config;
pub use self::config::Config;

mod identity;
pub use self::identity::{AppUser, Role};

mod state;
pub use self::state::SessionState;

mod uow;
pub(crate) use self::uow::UnitOfWork;

mod view_store;

mod middleware;
