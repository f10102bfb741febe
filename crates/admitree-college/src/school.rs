use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::PlannerError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// One college in the catalog.
pub struct School {
    /// Unique key.
    pub name: String,
    /// Percentage of applicants admitted, 0 to 100.
    pub acceptance_rate: f64,
    /// Informational only.
    #[serde(rename = "SAT_quartiles", default)]
    pub sat_quartiles: Vec<u32>,
    /// Whether the student is still considering this school.
    pub applying: bool,
    /// Preference strength, only used by the reward model.
    #[serde(alias = "desireability")]
    pub desirability: i64,
}

impl School {
    pub fn new(name: impl Into<String>, acceptance_rate: f64, desirability: i64) -> Self {
        School {
            name: name.into(),
            acceptance_rate,
            sat_quartiles: Vec::new(),
            applying: true,
            desirability,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<School>", into = "Vec<School>")]
/// Ordered, validated school catalog. Names are unique and acceptance rates lie in [0, 100].
pub struct Catalog {
    schools: Vec<School>,
}

impl Catalog {
    /// Validate and wrap `schools`, keeping their order.
    pub fn new(schools: Vec<School>) -> Result<Self, PlannerError> {
        let mut names = HashSet::with_capacity(schools.len());
        for school in &schools {
            if !names.insert(school.name.as_str()) {
                return Err(PlannerError::DuplicateSchool {
                    name: school.name.clone(),
                });
            }
            if !(0.0..=100.0).contains(&school.acceptance_rate) {
                return Err(PlannerError::InvalidAcceptanceRate {
                    name: school.name.clone(),
                    rate: school.acceptance_rate,
                });
            }
        }
        Ok(Catalog { schools })
    }

    /// Look a school up by exact name.
    pub fn get(&self, name: &str) -> Option<&School> {
        self.schools.iter().find(|school| school.name == name)
    }

    /// Look a school up by exact name, failing with `UnknownSchool`.
    pub fn require(&self, name: &str) -> Result<&School, PlannerError> {
        self.get(name).ok_or_else(|| PlannerError::UnknownSchool {
            name: name.to_string(),
        })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, School> {
        self.schools.iter()
    }

    /// Schools the student is still applying to, in catalog order.
    pub fn applying(&self) -> impl Iterator<Item = &School> {
        self.schools.iter().filter(|school| school.applying)
    }

    pub fn len(&self) -> usize {
        self.schools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schools.is_empty()
    }
}

impl TryFrom<Vec<School>> for Catalog {
    type Error = PlannerError;

    fn try_from(schools: Vec<School>) -> Result<Self, Self::Error> {
        Catalog::new(schools)
    }
}

impl From<Catalog> for Vec<School> {
    fn from(catalog: Catalog) -> Self {
        catalog.schools
    }
}
