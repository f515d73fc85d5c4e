//! Registration and login endpoints.
//!
//! Customer and staff signup provision an account with a single role; staff
//! signup additionally records the coverage units they serve. Login verifies
//! the password and issues role-carrying JWT tokens.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::user_auth::ActorContext;
use domain::models::role::AppRole;
use domain::models::user::UserProfile;
use persistence::repositories::{NewUser, PanchayathRepository, UserRepository};
use shared::password::{hash_password, validate_password_strength, verify_password};
use shared::validation::normalize_mobile;

/// Request body for customer registration.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterCustomerRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,

    #[validate(custom(function = "shared::validation::validate_mobile"))]
    pub mobile: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Request body for staff registration.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterStaffRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,

    #[validate(custom(function = "shared::validation::validate_mobile"))]
    pub mobile: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    pub panchayath_id: uuid::Uuid,

    #[validate(length(min = 1, message = "At least one ward must be selected"))]
    pub ward_numbers: Vec<i32>,
}

/// Request body for login.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(custom(function = "shared::validation::validate_mobile"))]
    pub mobile: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Token information in response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokensResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Response body for successful registration or login.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserProfile,
    pub tokens: TokensResponse,
}

/// Register a new customer account.
///
/// POST /api/v1/auth/register/customer
pub async fn register_customer(
    State(state): State<AppState>,
    Json(request): Json<RegisterCustomerRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    request.validate()?;
    validate_password_strength(&request.password)
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let phone = normalize_mobile(&request.mobile);
    let password_hash =
        hash_password(&request.password).map_err(|e| ApiError::Internal(e.to_string()))?;

    let repo = UserRepository::new(state.pool.clone());
    let user = repo
        .create(NewUser {
            full_name: request.name,
            phone: phone.clone(),
            email: request.email,
            password_hash,
            role: AppRole::Customer.as_str().to_string(),
        })
        .await
        .map_err(map_duplicate_phone)?;

    info!(user_id = %user.id, "Customer registered");

    let response = build_auth_response(&state, user.into_domain())?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Register a new staff account with its coverage units.
///
/// POST /api/v1/auth/register/staff
pub async fn register_staff(
    State(state): State<AppState>,
    Json(request): Json<RegisterStaffRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    request.validate()?;
    validate_password_strength(&request.password)
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    // The selected wards must exist in the chosen panchayath.
    let panchayath = PanchayathRepository::new(state.pool.clone())
        .find_by_id(request.panchayath_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Panchayath not found".to_string()))?;

    if let Some(bad) = request
        .ward_numbers
        .iter()
        .find(|w| **w < 1 || **w > panchayath.ward_count)
    {
        return Err(ApiError::Validation(format!(
            "Ward {} does not exist in {} (1-{})",
            bad, panchayath.name, panchayath.ward_count
        )));
    }

    let phone = normalize_mobile(&request.mobile);
    let password_hash =
        hash_password(&request.password).map_err(|e| ApiError::Internal(e.to_string()))?;

    let repo = UserRepository::new(state.pool.clone());
    let user = repo
        .create_staff(
            NewUser {
                full_name: request.name,
                phone,
                email: None,
                password_hash,
                role: AppRole::Staff.as_str().to_string(),
            },
            request.panchayath_id,
            &request.ward_numbers,
        )
        .await
        .map_err(map_duplicate_phone)?;

    info!(
        user_id = %user.id,
        panchayath_id = %request.panchayath_id,
        wards = ?request.ward_numbers,
        "Staff registered"
    );

    let response = build_auth_response(&state, user.into_domain())?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Log in with mobile number and password.
///
/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    request.validate()?;

    let phone = normalize_mobile(&request.mobile);
    let repo = UserRepository::new(state.pool.clone());

    let user = repo
        .find_by_phone(&phone)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid mobile number or password".to_string()))?;

    let password_ok = verify_password(&request.password, &user.password_hash)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    if !password_ok {
        return Err(ApiError::Unauthorized(
            "Invalid mobile number or password".to_string(),
        ));
    }

    info!(user_id = %user.id, role = %user.role, "User logged in");

    let response = build_auth_response(&state, user.into_domain())?;
    Ok(Json(response))
}

fn build_auth_response(state: &AppState, user: UserProfile) -> Result<AuthResponse, ApiError> {
    let jwt_config = ActorContext::create_jwt_config(&state.config.jwt)
        .map_err(|e| ApiError::Internal(format!("Failed to initialize auth: {}", e)))?;

    let role = user.role.as_str();
    let (access_token, _) = jwt_config
        .generate_access_token(user.id, role)
        .map_err(|e| ApiError::Internal(format!("Token error: {}", e)))?;
    let (refresh_token, _) = jwt_config
        .generate_refresh_token(user.id, role)
        .map_err(|e| ApiError::Internal(format!("Token error: {}", e)))?;

    Ok(AuthResponse {
        user,
        tokens: TokensResponse {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: jwt_config.access_token_expiry_secs,
        },
    })
}

fn map_duplicate_phone(err: sqlx::Error) -> ApiError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.code().as_deref() == Some("23505") {
            return ApiError::Conflict(
                "An account with this mobile number already exists".to_string(),
            );
        }
    }
    err.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_customer_request_valid() {
        let request = RegisterCustomerRequest {
            name: "Asha Nair".to_string(),
            mobile: "98765 43210".to_string(),
            email: None,
            password: "cleanpass1".to_string(),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_register_customer_request_bad_mobile() {
        let request = RegisterCustomerRequest {
            name: "Asha Nair".to_string(),
            mobile: "12345".to_string(),
            email: None,
            password: "cleanpass1".to_string(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_register_staff_request_requires_wards() {
        let request = RegisterStaffRequest {
            name: "Devika Menon".to_string(),
            mobile: "9876543210".to_string(),
            password: "staffpass1".to_string(),
            panchayath_id: uuid::Uuid::new_v4(),
            ward_numbers: vec![],
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_login_request_deserialization() {
        let json = r#"{"mobile": "9876543210", "password": "secret123"}"#;
        let request: LoginRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.mobile, "9876543210");
        assert!(request.validate().is_ok());
    }
}
