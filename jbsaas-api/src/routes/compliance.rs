/// Compliance lookup endpoints
///
/// Validates ABNs locally (checksum) and resolves AHPRA registration
/// numbers against the mock register. Lookups are read-only; whether a
/// business acts on a suspended registration is their problem, ours is
/// reporting it accurately.

use crate::{app::AppState, error::{ApiError, ApiResult}};
use axum::{
    extract::{Path, State},
    Json,
};
use jbsaas_shared::compliance::{self, Register, RegistrationRecord};
use serde::Serialize;

/// ABN validation result
#[derive(Debug, Serialize)]
pub struct AbnResponse {
    /// The ABN as queried
    pub abn: String,

    /// Whether the checksum passes
    pub valid: bool,

    /// Register entry, when the ABN is known to the mock ASIC register
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration: Option<RegistrationRecord>,
}

/// AHPRA lookup result
#[derive(Debug, Serialize)]
pub struct AhpraResponse {
    /// The number as queried
    pub registration_number: String,

    /// Whether the format is valid
    pub valid_format: bool,

    /// Register entry, when found
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration: Option<RegistrationRecord>,
}

/// Validates an ABN and looks it up on the register
///
/// `GET /v1/compliance/abn/:abn`
pub async fn validate_abn(
    State(state): State<AppState>,
    Path(abn): Path<String>,
) -> ApiResult<Json<AbnResponse>> {
    let valid = compliance::validate_abn(&abn);

    let registration = if valid {
        RegistrationRecord::lookup(&state.db, Register::Asic, &abn).await?
    } else {
        None
    };

    Ok(Json(AbnResponse {
        abn,
        valid,
        registration,
    }))
}

/// Looks up an AHPRA registration number
///
/// `GET /v1/compliance/ahpra/:number`
///
/// # Errors
///
/// - `400 Bad Request`: Number is not in AHPRA format
pub async fn lookup_ahpra(
    State(state): State<AppState>,
    Path(number): Path<String>,
) -> ApiResult<Json<AhpraResponse>> {
    if !compliance::validate_ahpra_format(&number) {
        return Err(ApiError::BadRequest(
            "AHPRA registration must be 3 letters followed by 10 digits".to_string(),
        ));
    }

    let registration = RegistrationRecord::lookup(&state.db, Register::Ahpra, &number).await?;

    Ok(Json(AhpraResponse {
        registration_number: number,
        valid_format: true,
        registration,
    }))
}
