use async_trait::async_trait;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};

#[async_trait]
pub trait ReadMfaToken: Send + Sync {
    async fn read_mfa_token(&self, mfa_serial: &str) -> anyhow::Result<String>;
}

/// Prompts on the terminal. Reads asynchronously so a deadline or
/// cancellation can interrupt the wait.
pub struct StdinMfaTokenReader;

#[async_trait]
impl ReadMfaToken for StdinMfaTokenReader {
    async fn read_mfa_token(&self, mfa_serial: &str) -> anyhow::Result<String> {
        // the prompt goes to stderr; stdout may be captured by `eval`
        let mut stderr = io::stderr();
        stderr
            .write_all(format!("Enter MFA code for {}: ", mfa_serial).as_bytes())
            .await?;
        stderr.flush().await?;

        let mut code = String::new();
        let read = BufReader::new(io::stdin()).read_line(&mut code).await?;
        if read == 0 {
            return Err(anyhow::anyhow!(
                "stdin closed before an MFA code was entered. mfa_serial:{}",
                mfa_serial
            ));
        }
        Ok(code.trim().to_string())
    }
}
