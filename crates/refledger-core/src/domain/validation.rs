use crate::domain::{
    entities::{conversion::ConversionRecord, ledger::PointsGrant},
    error::DomainError,
};

/// Centralized domain validation.
///
/// All validation logic lives here, not scattered across entities.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_conversion(record: &ConversionRecord) -> Result<(), DomainError> {
        record.validate()
    }

    /// A grant built through `PointsGrantBuilder` already holds these
    /// constraints; this re-checks grants reconstructed from persistence.
    pub fn validate_grant(grant: &PointsGrant) -> Result<(), DomainError> {
        if grant.points == 0 {
            return Err(DomainError::ZeroPointGrant {
                reference_id: grant.reference_id.clone(),
            });
        }
        if grant.reference_id.is_empty() {
            return Err(DomainError::InvalidGrant(
                "reference id cannot be empty".into(),
            ));
        }
        Ok(())
    }
}
