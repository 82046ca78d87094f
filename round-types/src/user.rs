use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Role assigned once at first login and immutable afterwards.
///
/// `Exempt` accounts get their taps acknowledged but never counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Role {
    User,
    Admin,
    Exempt,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
            Role::Exempt => "exempt",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            "exempt" => Ok(Role::Exempt),
            _ => Err(()),
        }
    }
}
