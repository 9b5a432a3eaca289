//! Command-line interface definition.

use std::path::PathBuf;

use careportal_domain::SignupForm;
use careportal_infrastructure::{ConfigError, PortalConfig};
use clap::{Args, Parser, Subcommand};

/// CarePortal dashboard shell.
#[derive(Debug, Parser)]
#[command(name = "careportal")]
#[command(about = "Healthcare record portal client", long_about = None)]
pub struct Cli {
    /// API base address (overrides CAREPORTAL_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Directory holding the saved session (overrides CAREPORTAL_STORAGE_DIR)
    #[arg(long, global = true)]
    pub storage_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Resolves the configuration: defaults, then environment, then flags.
    ///
    /// # Errors
    /// Returns an error if any override is invalid.
    pub fn config(&self) -> Result<PortalConfig, ConfigError> {
        let mut config = PortalConfig::from_env()?;
        if let Some(url) = &self.api_url {
            config = config.with_api_url(url)?;
        }
        if let Some(dir) = &self.storage_dir {
            config = config.with_storage_dir(dir);
        }
        Ok(config)
    }
}

/// Shell commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in with email and password
    Login {
        /// Account email
        #[arg(long)]
        email: String,
        /// Account password
        #[arg(long, env = "CAREPORTAL_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Sign in with a code sent to a phone number
    PhoneLogin {
        /// Phone number to send the code to
        phone: String,
    },

    /// Register a patient account
    Signup(SignupArgs),

    /// Forget the saved session
    Logout,

    /// Show the signed-in role
    Whoami,

    /// List medical records
    Records {
        /// Filter by title or content
        #[arg(long)]
        search: Option<String>,
    },

    /// Upload a record directly (patients)
    Upload {
        /// File to upload
        file: PathBuf,
    },

    /// Upload a record after OTP verification (managers)
    SecureUpload {
        /// File to upload
        file: PathBuf,
    },

    /// Delete a record after OTP verification (managers)
    SecureDelete {
        /// Record identifier
        record_id: String,
        /// Title shown in the verification prompt (defaults to the id)
        #[arg(long)]
        title: Option<String>,
    },

    /// Ask a question about a record
    Ask {
        /// Record identifier
        record_id: String,
        /// The question
        question: String,
    },

    /// Semantic search across records
    Search {
        /// Search query
        query: String,
    },

    /// List user accounts (admins)
    Users,

    /// Show the audit trail (admins)
    AuditLogs,

    /// Search patients by name or medical id
    Patients {
        /// Search query
        query: String,
    },
}

/// Patient registration fields.
#[derive(Debug, Args)]
pub struct SignupArgs {
    /// Account email
    #[arg(long)]
    pub email: String,
    /// Account password
    #[arg(long, env = "CAREPORTAL_PASSWORD", hide_env_values = true)]
    pub password: String,
    /// Password confirmation
    #[arg(long)]
    pub confirm_password: String,
    /// Phone number
    #[arg(long)]
    pub phone: String,
    /// First name
    #[arg(long)]
    pub first_name: String,
    /// Last name
    #[arg(long)]
    pub last_name: String,
    /// Date of birth (YYYY-MM-DD)
    #[arg(long)]
    pub date_of_birth: String,
    /// Gender
    #[arg(long)]
    pub gender: String,
    /// Blood type (optional)
    #[arg(long, default_value = "")]
    pub blood_type: String,
    /// Emergency contact (optional)
    #[arg(long, default_value = "")]
    pub emergency_contact: String,
    /// Postal address (optional)
    #[arg(long, default_value = "")]
    pub address: String,
}

impl From<SignupArgs> for SignupForm {
    fn from(args: SignupArgs) -> Self {
        Self {
            email: args.email,
            password: args.password,
            confirm_password: args.confirm_password,
            phone: args.phone,
            first_name: args.first_name,
            last_name: args.last_name,
            date_of_birth: args.date_of_birth,
            gender: args.gender,
            blood_type: args.blood_type,
            emergency_contact: args.emergency_contact,
            address: args.address,
        }
    }
}
