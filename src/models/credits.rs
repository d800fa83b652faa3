use serde::{Deserialize, Serialize};

use super::{null_as_default, MovieId};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cast {
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub character: String,
    #[serde(default)]
    pub profile_path: Option<String>,
    /// Billing order, lower is more prominent
    #[serde(default, deserialize_with = "null_as_default")]
    pub order: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Crew {
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub job: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub department: String,
    #[serde(default)]
    pub profile_path: Option<String>,
}

/// GET /movie/{movie_id}/credits
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Credits {
    pub id: MovieId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cast: Vec<Cast>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub crew: Vec<Crew>,
}

impl Credits {
    /// The `n` most prominent cast members by billing order
    pub fn top_cast(&self, n: usize) -> Vec<&Cast> {
        let mut cast: Vec<&Cast> = self.cast.iter().collect();
        cast.sort_by_key(|c| c.order);
        cast.truncate(n);
        cast
    }

    pub fn directors(&self) -> Vec<&Crew> {
        self.crew.iter().filter(|c| c.job == "Director").collect()
    }
}
