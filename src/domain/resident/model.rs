//! Resident domain entity

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Residency status. Every status except `Moved` counts as living in the building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ResidentStatus {
    #[serde(alias = "Resident")]
    Active,
    Temporary,
    Absent,
    Moved,
}

impl Default for ResidentStatus {
    fn default() -> Self {
        Self::Active
    }
}

impl std::fmt::Display for ResidentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Temporary => write!(f, "Temporary"),
            Self::Absent => write!(f, "Absent"),
            Self::Moved => write!(f, "Moved"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Gender {
    Male,
    Female,
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Male => write!(f, "Male"),
            Self::Female => write!(f, "Female"),
        }
    }
}

/// A person registered in the building.
///
/// `id` is the national identity number supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Resident {
    pub id: i64,
    pub name: String,
    pub dob: Option<NaiveDate>,
    pub gender: Option<Gender>,
    /// Citizen identity card number
    pub cic: Option<String>,
    pub status: ResidentStatus,
    pub apartment_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resident {
    pub fn is_moved(&self) -> bool {
        self.status == ResidentStatus::Moved
    }

    /// Mark as moved out. A moved resident never keeps an apartment link.
    pub fn move_out(&mut self) {
        self.status = ResidentStatus::Moved;
        self.apartment_id = None;
        self.updated_at = Utc::now();
    }

    pub fn detach(&mut self) {
        self.apartment_id = None;
        self.updated_at = Utc::now();
    }

    pub fn attach(&mut self, apartment_id: i64) {
        self.apartment_id = Some(apartment_id);
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResidentFilter {
    /// Case-sensitive substring match on name
    pub name: Option<String>,
    pub status: Option<ResidentStatus>,
    pub apartment_id: Option<i64>,
    /// Leave out residents whose status is `Moved`
    pub exclude_moved: bool,
}

impl ResidentFilter {
    pub fn matches(&self, resident: &Resident) -> bool {
        if self.exclude_moved && resident.is_moved() {
            return false;
        }
        if let Some(name) = &self.name {
            if !resident.name.contains(name.as_str()) {
                return false;
            }
        }
        if let Some(status) = self.status {
            if resident.status != status {
                return false;
            }
        }
        if let Some(apartment_id) = self.apartment_id {
            if resident.apartment_id != Some(apartment_id) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resident(status: ResidentStatus) -> Resident {
        Resident {
            id: 1,
            name: "Nguyen Van A".into(),
            dob: None,
            gender: Some(Gender::Male),
            cic: Some("001".into()),
            status,
            apartment_id: Some(101),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn move_out_clears_apartment() {
        let mut r = resident(ResidentStatus::Active);
        r.move_out();
        assert!(r.is_moved());
        assert_eq!(r.apartment_id, None);
    }

    #[test]
    fn filter_excludes_moved() {
        let filter = ResidentFilter {
            exclude_moved: true,
            ..Default::default()
        };
        assert!(filter.matches(&resident(ResidentStatus::Temporary)));
        assert!(!filter.matches(&resident(ResidentStatus::Moved)));
    }

    #[test]
    fn filter_by_name_and_apartment() {
        let filter = ResidentFilter {
            name: Some("Van".into()),
            apartment_id: Some(101),
            ..Default::default()
        };
        assert!(filter.matches(&resident(ResidentStatus::Active)));

        let other = ResidentFilter {
            apartment_id: Some(102),
            ..Default::default()
        };
        assert!(!other.matches(&resident(ResidentStatus::Active)));
    }

    #[test]
    fn legacy_resident_status_is_accepted() {
        let status: ResidentStatus = serde_json::from_str("\"Resident\"").unwrap();
        assert_eq!(status, ResidentStatus::Active);
        assert_eq!(ResidentStatus::Moved.to_string(), "Moved");
    }
}
