/// Business profile endpoints
///
/// CRUD for the tenant's business profiles. Every query is scoped to the
/// authenticated user; deleting is a soft delete so generated posts keep
/// their provenance.
///
/// Profiles flagged `is_healthcare` must carry an AHPRA registration
/// number in the expected format; ABNs are checksum-validated on write.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use jbsaas_shared::{
    auth::middleware::AuthContext,
    compliance,
    models::{BusinessProfile, CreateBusinessProfile, UpdateBusinessProfile},
};
use serde_json::json;
use uuid::Uuid;

/// Validates the compliance fields of a profile before writing
fn check_compliance_fields(
    is_healthcare: bool,
    ahpra_registration: Option<&str>,
    abn: Option<&str>,
) -> ApiResult<()> {
    let mut errors = Vec::new();

    if is_healthcare {
        match ahpra_registration {
            None => errors.push(ValidationErrorDetail {
                field: "ahpra_registration".to_string(),
                message: "Healthcare businesses must provide an AHPRA registration number"
                    .to_string(),
            }),
            Some(number) if !compliance::validate_ahpra_format(number) => {
                errors.push(ValidationErrorDetail {
                    field: "ahpra_registration".to_string(),
                    message: "AHPRA registration must be 3 letters followed by 10 digits"
                        .to_string(),
                })
            }
            Some(_) => {}
        }
    }

    if let Some(abn) = abn {
        if !compliance::validate_abn(abn) {
            errors.push(ValidationErrorDetail {
                field: "abn".to_string(),
                message: "ABN failed checksum validation".to_string(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::ValidationError(errors))
    }
}

/// Creates a business profile
///
/// `POST /v1/profiles`
pub async fn create_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateBusinessProfile>,
) -> ApiResult<Json<BusinessProfile>> {
    if req.business_name.trim().is_empty() {
        return Err(ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "business_name".to_string(),
            message: "Business name is required".to_string(),
        }]));
    }

    check_compliance_fields(
        req.is_healthcare,
        req.ahpra_registration.as_deref(),
        req.abn.as_deref(),
    )?;

    let profile = BusinessProfile::create(&state.db, auth.user_id, req).await?;

    tracing::info!(user_id = %auth.user_id, profile_id = %profile.id, "Business profile created");

    Ok(Json(profile))
}

/// Lists the user's profiles
///
/// `GET /v1/profiles`
pub async fn list_profiles(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<BusinessProfile>>> {
    let profiles = BusinessProfile::list_by_user(&state.db, auth.user_id).await?;
    Ok(Json(profiles))
}

/// Fetches one profile
///
/// `GET /v1/profiles/:id`
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<BusinessProfile>> {
    let profile = BusinessProfile::find_by_id_and_user(&state.db, id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;

    Ok(Json(profile))
}

/// Partially updates a profile
///
/// `PUT /v1/profiles/:id`
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateBusinessProfile>,
) -> ApiResult<Json<BusinessProfile>> {
    let profile = BusinessProfile::update(&state.db, id, auth.user_id, req)
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;

    Ok(Json(profile))
}

/// Soft-deletes a profile
///
/// `DELETE /v1/profiles/:id`
pub async fn delete_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let deleted = BusinessProfile::soft_delete(&state.db, id, auth.user_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Profile not found".to_string()));
    }

    Ok(Json(json!({ "deleted": true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_healthcare_requires_ahpra() {
        let err = check_compliance_fields(true, None, None).unwrap_err();
        assert!(matches!(err, ApiError::ValidationError(_)));
    }

    #[test]
    fn test_healthcare_with_valid_ahpra_passes() {
        assert!(check_compliance_fields(true, Some("MED0001234567"), None).is_ok());
    }

    #[test]
    fn test_malformed_ahpra_rejected() {
        let err = check_compliance_fields(true, Some("12345"), None).unwrap_err();
        assert!(matches!(err, ApiError::ValidationError(_)));
    }

    #[test]
    fn test_bad_abn_rejected_even_for_non_healthcare() {
        let err = check_compliance_fields(false, None, Some("11111111111")).unwrap_err();
        assert!(matches!(err, ApiError::ValidationError(_)));
    }

    #[test]
    fn test_valid_abn_passes() {
        assert!(check_compliance_fields(false, None, Some("51824753556")).is_ok());
    }
}
