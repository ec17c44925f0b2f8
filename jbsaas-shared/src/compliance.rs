/// AHPRA and ABN registration validation
///
/// Healthcare businesses must display a valid AHPRA registration number,
/// and Australian businesses an ABN. Format and checksum validation happen
/// locally; lookups resolve against the `compliance_registrations` table,
/// which mirrors the public registers.
///
/// AHPRA numbers are a three-letter profession code followed by ten digits
/// (e.g. `MED0001234567`). ABNs are eleven digits validated by the
/// published modulus-89 weighting.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// ABN checksum weights, applied after subtracting 1 from the first digit
const ABN_WEIGHTS: [u32; 11] = [10, 1, 3, 5, 7, 9, 11, 13, 15, 17, 19];

/// Which register a number belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Register {
    /// Australian Health Practitioner Regulation Agency
    Ahpra,
    /// Australian Securities and Investments Commission (ABN holders)
    Asic,
}

impl Register {
    pub fn as_str(&self) -> &'static str {
        match self {
            Register::Ahpra => "ahpra",
            Register::Asic => "asic",
        }
    }
}

impl std::fmt::Display for Register {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Register {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ahpra" => Ok(Register::Ahpra),
            "asic" => Ok(Register::Asic),
            other => Err(format!("Unknown register: {}", other)),
        }
    }
}

/// A row in the mock register
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RegistrationRecord {
    pub id: Uuid,
    pub registration_number: String,
    pub register: String,
    pub registrant_name: String,
    pub profession: Option<String>,
    pub registration_status: String,
    pub created_at: DateTime<Utc>,
}

impl RegistrationRecord {
    /// Looks up a registration number on the given register
    pub async fn lookup(
        pool: &PgPool,
        register: Register,
        number: &str,
    ) -> Result<Option<RegistrationRecord>, sqlx::Error> {
        sqlx::query_as::<_, RegistrationRecord>(
            r#"
            SELECT id, registration_number, register, registrant_name,
                   profession, registration_status, created_at
            FROM compliance_registrations
            WHERE register = $1 AND registration_number = $2
            "#,
        )
        .bind(register.as_str())
        .bind(number)
        .fetch_optional(pool)
        .await
    }
}

/// Validates an ABN's length and modulus-89 checksum
///
/// Per the ATO algorithm: subtract 1 from the leading digit, weight each
/// digit, and the weighted sum must divide evenly by 89. Whitespace is
/// tolerated since ABNs are conventionally printed `XX XXX XXX XXX`.
pub fn validate_abn(abn: &str) -> bool {
    let digits: Vec<u32> = abn
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_digit(10))
        .collect::<Option<Vec<u32>>>()
        .unwrap_or_default();

    if digits.len() != 11 || digits[0] == 0 {
        return false;
    }

    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, &d)| {
            let d = if i == 0 { d - 1 } else { d };
            d * ABN_WEIGHTS[i]
        })
        .sum();

    sum % 89 == 0
}

/// Validates the AHPRA number format: three ASCII letters then ten digits
///
/// Format only; whether the number exists on the register is a lookup.
pub fn validate_ahpra_format(number: &str) -> bool {
    let bytes = number.as_bytes();
    bytes.len() == 13
        && bytes[..3].iter().all(|b| b.is_ascii_uppercase())
        && bytes[3..].iter().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_valid_abn_passes_checksum() {
        assert!(validate_abn("51824753556"));
    }

    #[test]
    fn test_abn_tolerates_conventional_spacing() {
        assert!(validate_abn("51 824 753 556"));
    }

    #[test]
    fn test_transposed_abn_fails_checksum() {
        assert!(!validate_abn("51824753565"));
    }

    #[test]
    fn test_abn_rejects_wrong_length_and_letters() {
        assert!(!validate_abn("5182475355"));
        assert!(!validate_abn("518247535567"));
        assert!(!validate_abn("5182475355a"));
        assert!(!validate_abn(""));
    }

    #[test]
    fn test_abn_rejects_leading_zero() {
        assert!(!validate_abn("01824753556"));
    }

    #[test]
    fn test_ahpra_format() {
        assert!(validate_ahpra_format("MED0001234567"));
        assert!(validate_ahpra_format("DEN0007654321"));

        assert!(!validate_ahpra_format("med0001234567"));
        assert!(!validate_ahpra_format("MED001234567"));
        assert!(!validate_ahpra_format("MEDI001234567"));
        assert!(!validate_ahpra_format("MED00012345678"));
        assert!(!validate_ahpra_format(""));
    }

    #[test]
    fn test_register_round_trip() {
        assert_eq!(Register::from_str("ahpra").unwrap(), Register::Ahpra);
        assert_eq!(Register::from_str("ASIC").unwrap(), Register::Asic);
        assert!(Register::from_str("tga").is_err());
        assert_eq!(Register::Ahpra.to_string(), "ahpra");
    }
}
