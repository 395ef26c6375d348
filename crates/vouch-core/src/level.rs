//! Trust level derivation.
//!
//! The level is derived state: it is never assigned by callers, only
//! recomputed from a record's fields after each transition.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::models::verification::{IdCardStatus, ReviewStatus, VerificationRecord};

/// Employer trust tier.
///
/// Serialized as its numeric value (0/1/2) on the wire and in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TrustLevel {
    Unverified,
    Identity,
    Business,
}

impl TrustLevel {
    pub fn as_u8(&self) -> u8 {
        match self {
            TrustLevel::Unverified => 0,
            TrustLevel::Identity => 1,
            TrustLevel::Business => 2,
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(TrustLevel::Unverified),
            1 => Some(TrustLevel::Identity),
            2 => Some(TrustLevel::Business),
            _ => None,
        }
    }
}

impl Serialize for TrustLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_u8())
    }
}

impl<'de> Deserialize<'de> for TrustLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = u8::deserialize(deserializer)?;
        TrustLevel::from_u8(value)
            .ok_or_else(|| D::Error::custom(format!("invalid trust level: {value}")))
    }
}

/// Derive the trust level from a record's current fields.
///
/// Identity (1) requires a verified email and an approved ID card.
/// Business (2) additionally requires an approved legal document or an
/// inherited company verification. Documents approved before the
/// identity conditions hold do not count until they do.
pub fn compute_level(record: &VerificationRecord) -> TrustLevel {
    if !(record.email_verified && record.id_card.status == IdCardStatus::Approved) {
        return TrustLevel::Unverified;
    }
    let business_verified = record.inherited_from_company
        || record
            .documents
            .iter()
            .any(|d| d.status == ReviewStatus::Approved);
    if business_verified {
        TrustLevel::Business
    } else {
        TrustLevel::Identity
    }
}
