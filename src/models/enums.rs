use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(ContractStatus {
    Pending => "pending",
    InReview => "in_review",
    Completed => "completed",
});

str_enum!(DocumentType {
    Contract => "contract",
    Nda => "nda",
    Agreement => "agreement",
    Policy => "policy",
    Other => "other",
});

str_enum!(ReportSeverity {
    Low => "low",
    Medium => "medium",
    High => "high",
});

str_enum!(ReportStatus {
    PendingReview => "pending_review",
    UnderInvestigation => "under_investigation",
    Resolved => "resolved",
});
