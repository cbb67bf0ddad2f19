use async_trait::async_trait;

use assumers_schema::credentials::ProfileCredentials;
use assumers_schema::shell::Shell;

use crate::handler::{into_variables, HandleCredentials};

/// Prints shell statements that export the credentials, for use with
/// `eval "$(assumers terminal --export dev)"`.
pub struct ExportCredentialsHandler {
    shell: Shell,
}

impl ExportCredentialsHandler {
    pub fn new(shell: Shell) -> ExportCredentialsHandler {
        ExportCredentialsHandler { shell }
    }
}

#[async_trait]
impl HandleCredentials for ExportCredentialsHandler {
    async fn handle_credentials(self, credentials: ProfileCredentials) -> anyhow::Result<()> {
        for line in export_lines(&self.shell, &credentials)? {
            println!("{}", line);
        }
        Ok(())
    }
}

fn export_lines(shell: &Shell, credentials: &ProfileCredentials) -> anyhow::Result<Vec<String>> {
    let lines = into_variables(credentials)
        .into_iter()
        .map(|v| match (shell, v.value) {
            (Shell::Bash | Shell::Zsh, Some(value)) => {
                Ok(format!(r#"export "{}={}""#, v.name, value))
            }
            (Shell::Bash | Shell::Zsh, None) => Ok(format!("unset {}", v.name)),
            (Shell::Fish, Some(value)) => Ok(format!(r#"set -gx {} "{}""#, v.name, value)),
            (Shell::Fish, None) => Ok(format!("set -e {}", v.name)),
            (Shell::Unknown(s), _) => Err(anyhow::anyhow!("unsupported shell. shell:{}", s)),
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::tests::profile_credentials;

    #[test]
    fn bash_exports_and_unsets() {
        let lines = export_lines(&Shell::Bash, &profile_credentials(false)).unwrap();
        assert!(lines.contains(&r#"export "AWS_ACCESS_KEY_ID=AKIAEXAMPLE""#.to_string()));
        assert!(lines.contains(&"unset AWS_SESSION_TOKEN".to_string()));
        assert!(lines.contains(&"unset AWS_PROFILE".to_string()));
    }

    #[test]
    fn fish_uses_set() {
        let lines = export_lines(&Shell::Fish, &profile_credentials(true)).unwrap();
        assert!(lines.contains(&r#"set -gx AWS_SESSION_TOKEN "token""#.to_string()));
        assert!(lines.contains(&"set -e AWS_PROFILE".to_string()));
    }

    #[test]
    fn unknown_shell_is_rejected() {
        let shell = Shell::Unknown("nu".to_string());
        assert!(export_lines(&shell, &profile_credentials(true)).is_err());
    }
}
