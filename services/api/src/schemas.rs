use common::Field;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

/// `?q=` free-text filter on list endpoints.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusInput {
    #[serde(default, deserialize_with = "common::present")]
    pub status: Field,
}

#[derive(Debug, Deserialize)]
pub struct TimeInput {
    #[serde(default, deserialize_with = "common::present")]
    pub time: Field,
}

#[derive(Debug, Deserialize)]
pub struct DescriptionInput {
    #[serde(default, deserialize_with = "common::present")]
    pub description: Field,
}
