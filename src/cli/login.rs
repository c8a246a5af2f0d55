use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cli::print_json;
use crate::common::info;
use crate::config::Container;
use crate::{AdminkitError, Result};

/// Login
#[derive(Args, Debug)]
pub struct LoginCommand {
    /// Username (email)
    #[arg()]
    username: String,
    /// Password, read from stdin when omitted
    #[arg(long, env = "ADMINKIT_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

impl LoginCommand {
    pub async fn run(self, container: Container) -> Result<()> {
        let LoginCommand { username, password } = self;

        let password = match password {
            Some(password) => password,
            None => read_password().await?,
        };

        let session = container.spawn_session();
        let user = session
            .login(username, password)
            .await?
            .ok_or(AdminkitError::Unauthenticated)?;

        info!(user=%user.email, "Logged in");
        print_json(&user)
    }
}

async fn read_password() -> Result<String> {
    eprint!("password: ");
    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await?;
    Ok(line.trim_end_matches(['\r', '\n']).to_owned())
}
