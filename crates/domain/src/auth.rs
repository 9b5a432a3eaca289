//! Authentication payloads and their local validation.

use serde::{Deserialize, Serialize};

use crate::credential::{Credential, DEFAULT_ROLE};
use crate::error::{DomainError, DomainResult};
use crate::otp::OtpCode;

/// Minimum password length accepted at signup.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Minimum phone number length accepted for OTP login.
pub const MIN_PHONE_LENGTH: usize = 10;

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

impl LoginRequest {
    /// Creates a login request.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Checks that both fields are filled in.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::MissingFields`] naming the empty fields.
    pub fn validate(&self) -> DomainResult<()> {
        let missing: Vec<&'static str> = [("email", &self.email), ("password", &self.password)]
            .into_iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(name, _)| name)
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(DomainError::MissingFields { fields: missing })
        }
    }
}

/// Body of `POST /auth/send-otp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneOtpRequest {
    /// Phone number to send the code to.
    pub phone: String,
}

impl PhoneOtpRequest {
    /// Builds a request after checking the number's length.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidPhone`] for numbers shorter than ten
    /// characters.
    pub fn new(phone: &str) -> DomainResult<Self> {
        let phone = phone.trim();
        if phone.chars().count() < MIN_PHONE_LENGTH {
            return Err(DomainError::InvalidPhone);
        }
        Ok(Self {
            phone: phone.to_string(),
        })
    }
}

/// Body of `POST /auth/verify-otp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhoneOtpVerifyRequest {
    /// Phone number the code was sent to.
    pub phone: String,
    /// The six-digit code.
    pub otp: String,
}

impl PhoneOtpVerifyRequest {
    /// Builds a verify request from an already-validated code.
    #[must_use]
    pub fn new(phone: impl Into<String>, otp: &OtpCode) -> Self {
        Self {
            phone: phone.into(),
            otp: otp.as_str().to_string(),
        }
    }
}

/// Signup form as entered by the user, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupForm {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
    /// Password confirmation.
    pub confirm_password: String,
    /// Phone number.
    pub phone: String,
    /// Patient first name.
    pub first_name: String,
    /// Patient last name.
    pub last_name: String,
    /// Date of birth as entered (ISO date).
    pub date_of_birth: String,
    /// Gender.
    pub gender: String,
    /// Optional blood type.
    pub blood_type: String,
    /// Optional emergency contact.
    pub emergency_contact: String,
    /// Optional postal address.
    pub address: String,
}

impl SignupForm {
    /// Validates the form and produces the wire request.
    ///
    /// Checks run in order: required fields, password length, confirmation.
    ///
    /// # Errors
    ///
    /// Returns the first failing [`DomainError`].
    pub fn into_request(self) -> DomainResult<SignupRequest> {
        let required = [
            ("email", &self.email),
            ("password", &self.password),
            ("phone", &self.phone),
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("date_of_birth", &self.date_of_birth),
            ("gender", &self.gender),
        ];
        let missing: Vec<&'static str> = required
            .into_iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(name, _)| name)
            .collect();
        if !missing.is_empty() {
            return Err(DomainError::MissingFields { fields: missing });
        }

        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(DomainError::PasswordTooShort {
                min: MIN_PASSWORD_LENGTH,
            });
        }

        if self.password != self.confirm_password {
            return Err(DomainError::PasswordMismatch);
        }

        Ok(SignupRequest {
            email: self.email,
            password: self.password,
            phone: self.phone,
            patient: PatientProfile {
                first_name: self.first_name,
                last_name: self.last_name,
                date_of_birth: self.date_of_birth,
                gender: self.gender,
                blood_type: non_empty(self.blood_type),
                emergency_contact: non_empty(self.emergency_contact),
                address: non_empty(self.address),
            },
        })
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

/// Body of `POST /auth/signup`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignupRequest {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
    /// Phone number.
    pub phone: String,
    /// Patient profile created alongside the account.
    pub patient: PatientProfile,
}

/// Patient section of a signup request. Optional fields are sent as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatientProfile {
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Date of birth.
    pub date_of_birth: String,
    /// Gender.
    pub gender: String,
    /// Blood type.
    pub blood_type: Option<String>,
    /// Emergency contact.
    pub emergency_contact: Option<String>,
    /// Address.
    pub address: Option<String>,
}

/// User as returned alongside a token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// User identifier.
    #[serde(default)]
    pub id: Option<String>,
    /// Email, if any.
    #[serde(default)]
    pub email: Option<String>,
    /// Phone, if any.
    #[serde(default)]
    pub phone: Option<String>,
    /// Roles granted to the user.
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Successful response of login, signup and phone OTP verification.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenResponse {
    /// Bearer token.
    pub access_token: String,
    /// Role, when reported at top level.
    #[serde(default)]
    pub role: Option<String>,
    /// User profile, when reported.
    #[serde(default)]
    pub user: Option<UserProfile>,
}

impl TokenResponse {
    /// Resolves the role: top-level `role`, else the first of `user.roles`,
    /// else [`DEFAULT_ROLE`].
    #[must_use]
    pub fn resolved_role(&self) -> String {
        self.role
            .clone()
            .filter(|r| !r.is_empty())
            .or_else(|| self.user.as_ref().and_then(|u| u.roles.first().cloned()))
            .unwrap_or_else(|| DEFAULT_ROLE.to_string())
    }

    /// Converts into a credential using [`Self::resolved_role`].
    #[must_use]
    pub fn into_credential(self) -> Credential {
        let role = self.resolved_role();
        Credential::new(self.access_token, role)
    }
}
