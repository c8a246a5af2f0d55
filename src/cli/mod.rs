pub mod login;
pub mod logout;
pub mod nav;
pub mod refresh;
pub mod root;
pub mod storage;
pub mod theme;
pub mod whoami;

pub use root::{parse, AdminkitCommand, Command, GlobalOptions};

use serde::Serialize;

use crate::Result;

// Write value to stdout as pretty json.
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}
