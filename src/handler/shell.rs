use std::env;
use std::ffi::CString;

use async_trait::async_trait;
use tracing::debug;

use assumers_schema::credentials::ProfileCredentials;

use crate::handler::{into_variables, HandleCredentials, Variable};

/// Replaces the current process with `$SHELL`, credentials in its
/// environment.
pub struct ShellCredentialsHandler;

#[async_trait]
impl HandleCredentials for ShellCredentialsHandler {
    async fn handle_credentials(self, credentials: ProfileCredentials) -> anyhow::Result<()> {
        set_credentials(&credentials);
        start_shell_session()?;
        Ok(())
    }
}

fn set_credentials(request: &ProfileCredentials) {
    let variables = into_variables(request);
    for Variable { name, value } in variables {
        if let Some(value) = value {
            env::set_var(name, value);
        } else {
            env::remove_var(name);
        }
    }
}

fn start_shell_session() -> anyhow::Result<()> {
    let shell = env::var("SHELL")?;
    debug!("shell: {}, ", &shell);

    let shell = CString::new(shell.bytes().collect::<Vec<_>>())?;
    let args = vec![shell.clone()];
    nix::unistd::execv(&shell, &args)?;

    unreachable!("execv will replace the current process, so never reach this instruction.")
}
