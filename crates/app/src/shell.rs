//! Command execution against the portal core.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use careportal_application::{
    ApplicationError, AskRecord, CredentialStore, FileSystem, ListAuditLogs, ListRecords,
    ListUsers, Login, Logout, PhoneLogin, SearchPatients, SecureActionCoordinator,
    SecureActionError, SemanticSearch, Signup, UploadRecord,
};
use careportal_domain::{LoginRequest, PendingAction, UploadFile};
use careportal_infrastructure::{
    FileCredentialBackend, PortalConfig, ReqwestApiClient, TokioFileSystem,
};
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::cli::{Cli, Command};

const RESEND: &str = "resend";
const CANCEL: &str = "cancel";

/// Parses the configuration, restores the session, and runs one command.
///
/// `input` supplies OTP codes; results are written to `out`.
///
/// # Errors
/// Returns the first failure as a displayable error.
pub async fn run<R, W>(cli: Cli, input: &mut R, out: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let config = cli.config()?;
    let portal = Portal::connect(&config).await?;
    portal.execute(cli.command, input, out).await
}

/// The wired-up core: one credential store shared by one API client.
pub struct Portal {
    client: Arc<ReqwestApiClient>,
    credentials: CredentialStore,
    fs: TokioFileSystem,
}

impl Portal {
    /// Restores the saved session and builds the API client.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub async fn connect(config: &PortalConfig) -> Result<Self> {
        let backend = FileCredentialBackend::new(TokioFileSystem::new(), config.session_file());
        let credentials = CredentialStore::load(Arc::new(backend)).await;
        let client = ReqwestApiClient::new(config, credentials.clone())?;
        debug!(api = %config.api_base_url, "portal ready");

        Ok(Self {
            client: Arc::new(client),
            credentials,
            fs: TokioFileSystem::new(),
        })
    }

    /// Returns the shared credential store.
    #[must_use]
    pub const fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    fn client(&self) -> Arc<ReqwestApiClient> {
        Arc::clone(&self.client)
    }

    /// Runs one command.
    ///
    /// # Errors
    /// Returns validation, remote, and persistence failures.
    pub async fn execute<R, W>(&self, command: Command, input: &mut R, out: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        match command {
            Command::Login { email, password } => {
                let credential = Login::new(self.client(), self.credentials.clone())
                    .execute(LoginRequest::new(email, password))
                    .await?;
                writeln!(out, "Signed in as {}", credential.role)?;
            }
            Command::PhoneLogin { phone } => self.phone_login(&phone, input, out).await?,
            Command::Signup(args) => {
                let credential = Signup::new(self.client(), self.credentials.clone())
                    .execute(args.into())
                    .await?;
                writeln!(out, "Account created. Signed in as {}", credential.role)?;
            }
            Command::Logout => {
                Logout::new(self.credentials.clone()).execute().await?;
                writeln!(out, "Signed out")?;
            }
            Command::Whoami => match self.credentials.credential().await {
                Some(credential) if !credential.role.is_empty() => writeln!(
                    out,
                    "Signed in as {} (dashboard: /{})",
                    credential.role,
                    credential.dashboard_slug()
                )?,
                Some(_) => writeln!(out, "Signed in")?,
                None => writeln!(out, "Not signed in")?,
            },
            Command::Records { search } => {
                let records = ListRecords::new(self.client())
                    .execute(search.as_deref())
                    .await?;
                print_json(out, &records)?;
            }
            Command::Upload { file } => {
                let file = self.read_upload(&file).await?;
                let response = UploadRecord::new(self.client()).execute(&file).await?;
                writeln!(out, "Record uploaded successfully!")?;
                print_json(out, &response)?;
            }
            Command::SecureUpload { file } => {
                let file = self.read_upload(&file).await?;
                self.secure_action(PendingAction::upload(file), input, out)
                    .await?;
            }
            Command::SecureDelete { record_id, title } => {
                let title = title.unwrap_or_else(|| record_id.clone());
                self.secure_action(PendingAction::delete(record_id, &title), input, out)
                    .await?;
            }
            Command::Ask {
                record_id,
                question,
            } => {
                let answer = AskRecord::new(self.client())
                    .execute(&record_id, &question)
                    .await?;
                writeln!(out, "{answer}")?;
            }
            Command::Search { query } => {
                let hits = SemanticSearch::new(self.client()).execute(&query).await?;
                if hits.is_empty() {
                    writeln!(out, "No matches")?;
                }
                for hit in hits {
                    writeln!(
                        out,
                        "{:>5.1}%  {}  {}",
                        hit.relevance_percent(),
                        hit.record_title,
                        hit.matched_text
                    )?;
                }
            }
            Command::Users => print_json(out, &ListUsers::new(self.client()).execute().await?)?,
            Command::AuditLogs => {
                print_json(out, &ListAuditLogs::new(self.client()).execute().await?)?;
            }
            Command::Patients { query } => {
                let patients = SearchPatients::new(self.client()).execute(&query).await?;
                print_json(out, &patients)?;
            }
        }
        Ok(())
    }

    async fn phone_login<R, W>(&self, phone: &str, input: &mut R, out: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let login = PhoneLogin::new(self.client(), self.credentials.clone());
        let phone = login.send_code(phone).await?;
        writeln!(out, "A verification code was sent to {phone}")?;

        loop {
            let Some(code) = prompt(input, out, "Enter the 6-digit code: ").await? else {
                bail!("No code entered");
            };
            match login.verify(&phone, &code).await {
                Ok(credential) => {
                    writeln!(out, "Signed in as {}", credential.role)?;
                    return Ok(());
                }
                Err(e @ ApplicationError::Validation(_)) => writeln!(out, "{e}")?,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Runs `action` behind an OTP challenge, reading codes from `input`.
    async fn secure_action<R, W>(
        &self,
        action: PendingAction,
        input: &mut R,
        out: &mut W,
    ) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut coordinator = SecureActionCoordinator::new(self.client());
        let challenge = coordinator.request_secure_action(action).await?;
        writeln!(out, "Verification code sent for: {}", challenge.action_label)?;

        loop {
            let message = format!("Enter the 6-digit code ('{RESEND}' or '{CANCEL}'): ");
            let Some(line) = prompt(input, out, &message).await? else {
                coordinator.cancel();
                bail!("Cancelled: no code entered");
            };

            match line.as_str() {
                CANCEL => {
                    coordinator.cancel();
                    writeln!(out, "Cancelled")?;
                    return Ok(());
                }
                RESEND => match coordinator.resend().await {
                    Ok(()) => writeln!(out, "A new code was sent")?,
                    Err(e) => writeln!(out, "{e}")?,
                },
                code => match coordinator.verify(code).await {
                    Ok(outcome) => {
                        writeln!(out, "{}", outcome.success_message())?;
                        return Ok(());
                    }
                    Err(
                        e @ (SecureActionError::InvalidCode(_)
                        | SecureActionError::Verification(_)),
                    ) => writeln!(out, "{e}")?,
                    Err(e) => return Err(e.into()),
                },
            }
        }
    }

    async fn read_upload(&self, path: &Path) -> Result<UploadFile> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .context("Upload path has no file name")?;
        let content = self
            .fs
            .read_file(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(UploadFile::new(file_name, content))
    }
}

async fn prompt<R, W>(input: &mut R, out: &mut W, message: &str) -> Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    write!(out, "{message}")?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line).await? == 0 {
        writeln!(out)?;
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn print_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(value)?)?;
    Ok(())
}
