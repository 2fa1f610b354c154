use serde::{Deserialize, Serialize};

/// Signup / login OTP request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterInput {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// OTP verification input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyOtpInput {
    pub email: String,
    pub otp: String,
}

/// Company as seen by the auth flow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthCompany {
    pub id: i64,
    pub email: String,
    pub name: String,
}

/// Issued session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub name: String,
    pub email: String,
    pub company_id: Option<i64>,
    pub is_verified: bool,
    pub profile_complete: bool,
}
