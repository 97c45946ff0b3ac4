use crate::areas::repository::Repository;
use crate::artifacts::push::transport::RemoteTransport;
use crate::errors::RepositoryError;
use std::io::Write;
use std::time::Duration;
use tokio::time::Instant;

/// How often and for how long `login` waits for the browser flow to finish.
#[derive(Debug, Clone, Copy)]
pub struct LoginPolling {
    pub interval: Duration,
    pub deadline: Duration,
}

impl Default for LoginPolling {
    fn default() -> Self {
        LoginPolling {
            interval: Duration::from_secs(2),
            deadline: Duration::from_secs(5 * 60),
        }
    }
}

impl Repository {
    /// Authenticate through the browser and store the credentials in the config.
    pub async fn login<T: RemoteTransport>(
        &mut self,
        transport: &T,
        api_url: &str,
        polling: LoginPolling,
    ) -> anyhow::Result<()> {
        let session = transport.start_login().await?;

        writeln!(self.writer(), "Log in or sign up in your browser:")?;
        writeln!(self.writer(), "    {}", session.login_url)?;
        writeln!(self.writer(), "Waiting for authentication to complete...")?;
        self.writer().flush()?;

        let started = Instant::now();
        let credentials = loop {
            if started.elapsed() > polling.deadline {
                return Err(RepositoryError::LoginTimedOut.into());
            }

            match transport.poll_login(&session.cli_token).await {
                Ok(Some(credentials)) => break credentials,
                Ok(None) => {}
                Err(error) => tracing::debug!(%error, "login poll failed, retrying"),
            }

            tokio::time::sleep(polling.interval).await;
        };

        let mut config = self.remote().load_config()?;
        config.username = Some(credentials.username.clone());
        config.api_key = Some(credentials.api_key);
        config.api_url = Some(api_url.to_string());
        self.remote().save_config(&config)?;

        writeln!(self.writer(), "Logged in as {}.", credentials.username)?;

        Ok(())
    }
}
