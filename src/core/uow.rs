use std::fmt;

use tokio::sync::oneshot;

use crate::common::{ErrorKind, Result};
use crate::core::{AppUser, SessionState};
use crate::protocol::AccessToken;
use crate::AdminkitError;

pub(crate) type Response<T> = std::result::Result<T, AdminkitError>;

pub(crate) enum UnitOfWork {
    Initialize(Work<(), SessionState>),
    Login(Work<Credential, Option<AppUser>>),
    Logout(Work<(), ()>),
    Refresh(Work<(), AccessToken>),
    ResolveIdentity(Work<(), Option<AppUser>>),
    Identity(Work<(), Option<AppUser>>),
    GetView(Work<String, Option<serde_json::Value>>),
    SetView(Work<(String, serde_json::Value), Option<serde_json::Value>>),
    RemoveView(Work<String, Option<serde_json::Value>>),
}

pub(crate) struct Work<Req, Res> {
    pub(crate) request: Req,
    // Wrap with option so that response can be sent via mut reference.
    pub(crate) response_sender: Option<oneshot::Sender<Response<Res>>>,
}

#[derive(Default)]
pub(crate) struct Credential {
    pub(crate) username: String,
    pub(crate) password: String,
}

impl<Req, Res> Work<Req, Res> {
    fn new(request: Req) -> (Self, oneshot::Receiver<Response<Res>>) {
        let (tx, rx) = oneshot::channel();
        (
            Work {
                request,
                response_sender: Some(tx),
            },
            rx,
        )
    }

    pub(crate) fn send_response(&mut self, response: Response<Res>) -> Result<()> {
        self.response_sender
            .take()
            .ok_or_else(|| ErrorKind::Internal("response already sent".to_owned()))?
            .send(response)
            .map_err(|_| ErrorKind::Internal("send to resp channel".to_owned()).into())
    }
}

macro_rules! constructor {
    ($name:ident, $variant:ident, $req:ty, $res:ty) => {
        pub(crate) fn $name(request: $req) -> (UnitOfWork, oneshot::Receiver<Response<$res>>) {
            let (work, rx) = Work::new(request);
            (UnitOfWork::$variant(work), rx)
        }
    };
}

impl UnitOfWork {
    constructor!(new_initialize, Initialize, (), SessionState);
    constructor!(new_login, Login, Credential, Option<AppUser>);
    constructor!(new_logout, Logout, (), ());
    constructor!(new_refresh, Refresh, (), AccessToken);
    constructor!(new_resolve_identity, ResolveIdentity, (), Option<AppUser>);
    constructor!(new_identity, Identity, (), Option<AppUser>);
    constructor!(new_get_view, GetView, String, Option<serde_json::Value>);
    constructor!(
        new_set_view,
        SetView,
        (String, serde_json::Value),
        Option<serde_json::Value>
    );
    constructor!(new_remove_view, RemoveView, String, Option<serde_json::Value>);

    pub(crate) fn name(&self) -> &'static str {
        match self {
            UnitOfWork::Initialize(_) => "initialize",
            UnitOfWork::Login(_) => "login",
            UnitOfWork::Logout(_) => "logout",
            UnitOfWork::Refresh(_) => "refresh",
            UnitOfWork::ResolveIdentity(_) => "resolve_identity",
            UnitOfWork::Identity(_) => "identity",
            UnitOfWork::GetView(_) => "get_view",
            UnitOfWork::SetView(_) => "set_view",
            UnitOfWork::RemoveView(_) => "remove_view",
        }
    }

    // Work that needs an access token.
    pub(crate) fn requires_session(&self) -> bool {
        matches!(
            self,
            UnitOfWork::Refresh(_)
                | UnitOfWork::GetView(_)
                | UnitOfWork::SetView(_)
                | UnitOfWork::RemoveView(_)
        )
    }

    // Answer the caller with an error instead of running the work.
    pub(crate) fn reject(self, err: AdminkitError) -> Result<()> {
        match self {
            UnitOfWork::Initialize(mut w) => w.send_response(Err(err)),
            UnitOfWork::Login(mut w) => w.send_response(Err(err)),
            UnitOfWork::Logout(mut w) => w.send_response(Err(err)),
            UnitOfWork::Refresh(mut w) => w.send_response(Err(err)),
            UnitOfWork::ResolveIdentity(mut w) => w.send_response(Err(err)),
            UnitOfWork::Identity(mut w) => w.send_response(Err(err)),
            UnitOfWork::GetView(mut w) => w.send_response(Err(err)),
            UnitOfWork::SetView(mut w) => w.send_response(Err(err)),
            UnitOfWork::RemoveView(mut w) => w.send_response(Err(err)),
        }
    }
}

// Credentials stay out of the logs.
impl fmt::Debug for UnitOfWork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitOfWork::Login(w) => write!(f, "login(user={})", w.request.username),
            UnitOfWork::GetView(w) | UnitOfWork::RemoveView(w) => {
                write!(f, "{}(view={})", self.name(), w.request)
            }
            UnitOfWork::SetView(w) => write!(f, "set_view(view={})", w.request.0),
            _ => f.write_str(self.name()),
        }
    }
}
