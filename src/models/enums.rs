//! Shared domain enums stored as TEXT columns

use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, Postgres};
use utoipa::ToSchema;

/// Implements sqlx TEXT conversion for an enum with `as_str` and `FromStr`
macro_rules! text_column {
    ($ty:ty) => {
        impl sqlx::Type<Postgres> for $ty {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <String as sqlx::Type<Postgres>>::type_info()
            }

            fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
                <String as sqlx::Type<Postgres>>::compatible(ty)
            }
        }

        impl<'r> Decode<'r, Postgres> for $ty {
            fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
                let s: String = Decode::<Postgres>::decode(value)?;
                s.parse().map_err(|e: String| e.into())
            }
        }

        impl Encode<'_, Postgres> for $ty {
            fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
                <&str as Encode<Postgres>>::encode(self.as_str(), buf)
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }
    };
}

// ---------------------------------------------------------------------------
// KennelStatus
// ---------------------------------------------------------------------------

/// Occupancy state of a kennel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum KennelStatus {
    Available,
    Reserved,
    Occupied,
    Maintenance,
}

impl KennelStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            KennelStatus::Available => "available",
            KennelStatus::Reserved => "reserved",
            KennelStatus::Occupied => "occupied",
            KennelStatus::Maintenance => "maintenance",
        }
    }

    /// A kennel holding a guest (booked or present) is tied to a live reservation
    pub fn is_engaged(&self) -> bool {
        matches!(self, KennelStatus::Reserved | KennelStatus::Occupied)
    }
}

impl std::str::FromStr for KennelStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "available" => Ok(KennelStatus::Available),
            "reserved" => Ok(KennelStatus::Reserved),
            "occupied" => Ok(KennelStatus::Occupied),
            "maintenance" => Ok(KennelStatus::Maintenance),
            _ => Err(format!("Invalid kennel status: {}", s)),
        }
    }
}

text_column!(KennelStatus);

// ---------------------------------------------------------------------------
// ReservationStatus
// ---------------------------------------------------------------------------

/// Reservation lifecycle state.
///
/// `reserved -> checkin -> checkout` or `reserved -> canceled`; both ends are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    #[serde(alias = "pending")]
    Reserved,
    Checkin,
    Checkout,
    Canceled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Reserved => "reserved",
            ReservationStatus::Checkin => "checkin",
            ReservationStatus::Checkout => "checkout",
            ReservationStatus::Canceled => "canceled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ReservationStatus::Checkout | ReservationStatus::Canceled)
    }

    pub fn can_transition_to(&self, next: ReservationStatus) -> bool {
        matches!(
            (self, next),
            (ReservationStatus::Reserved, ReservationStatus::Checkin)
                | (ReservationStatus::Reserved, ReservationStatus::Canceled)
                | (ReservationStatus::Checkin, ReservationStatus::Checkout)
        )
    }

    /// Status every kennel of a reservation in this state must carry
    pub fn kennel_status(&self) -> KennelStatus {
        match self {
            ReservationStatus::Reserved => KennelStatus::Reserved,
            ReservationStatus::Checkin => KennelStatus::Occupied,
            ReservationStatus::Checkout | ReservationStatus::Canceled => KennelStatus::Available,
        }
    }
}

impl std::str::FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reserved" | "pending" => Ok(ReservationStatus::Reserved),
            "checkin" => Ok(ReservationStatus::Checkin),
            "checkout" => Ok(ReservationStatus::Checkout),
            "canceled" | "cancelled" => Ok(ReservationStatus::Canceled),
            _ => Err(format!("Invalid reservation status: {}", s)),
        }
    }
}

text_column!(ReservationStatus);

// ---------------------------------------------------------------------------
// FeedingSlot
// ---------------------------------------------------------------------------

/// The two tracked feeding times per day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FeedingSlot {
    Morning,
    Noon,
}

impl FeedingSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedingSlot::Morning => "morning",
            FeedingSlot::Noon => "noon",
        }
    }
}

impl std::str::FromStr for FeedingSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "morning" => Ok(FeedingSlot::Morning),
            "noon" => Ok(FeedingSlot::Noon),
            _ => Err(format!("Invalid feeding time: {}", s)),
        }
    }
}

text_column!(FeedingSlot);

// ---------------------------------------------------------------------------
// StaffRole
// ---------------------------------------------------------------------------

/// Staff account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StaffRole {
    Staff,
    Admin,
}

impl StaffRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            StaffRole::Staff => "staff",
            StaffRole::Admin => "admin",
        }
    }
}

impl std::str::FromStr for StaffRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "staff" => Ok(StaffRole::Staff),
            "admin" => Ok(StaffRole::Admin),
            _ => Err(format!("Invalid staff role: {}", s)),
        }
    }
}

text_column!(StaffRole);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reservation_transitions() {
        use ReservationStatus::*;

        assert!(Reserved.can_transition_to(Checkin));
        assert!(Reserved.can_transition_to(Canceled));
        assert!(Checkin.can_transition_to(Checkout));

        assert!(!Checkin.can_transition_to(Reserved));
        assert!(!Checkin.can_transition_to(Canceled));
        assert!(!Canceled.can_transition_to(Reserved));
        assert!(!Checkout.can_transition_to(Checkin));
        assert!(!Reserved.can_transition_to(Checkout));
    }

    #[test]
    fn test_kennel_status_follows_reservation() {
        assert_eq!(ReservationStatus::Reserved.kennel_status(), KennelStatus::Reserved);
        assert_eq!(ReservationStatus::Checkin.kennel_status(), KennelStatus::Occupied);
        assert_eq!(ReservationStatus::Checkout.kennel_status(), KennelStatus::Available);
        assert_eq!(ReservationStatus::Canceled.kennel_status(), KennelStatus::Available);
    }

    #[test]
    fn test_legacy_pending_status() {
        assert_eq!("pending".parse::<ReservationStatus>(), Ok(ReservationStatus::Reserved));
        let status: ReservationStatus = serde_json::from_str("\"pending\"").unwrap();
        assert_eq!(status, ReservationStatus::Reserved);
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"reserved\"");
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!("lost".parse::<KennelStatus>().is_err());
        assert!("evening".parse::<FeedingSlot>().is_err());
        assert_eq!("MORNING".parse::<FeedingSlot>(), Ok(FeedingSlot::Morning));
    }
}
