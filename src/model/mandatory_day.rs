use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A leave-restricted window as stored. Employee and department
/// assignments live in the `mandatory_day_employees` and
/// `mandatory_day_departments` join tables.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct MandatoryDay {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "Year-End Freeze")]
    pub name: String,
    #[schema(example = "2025-12-29", value_type = String, format = "date")]
    pub start_date: NaiveDate,
    #[schema(example = "2025-12-31", value_type = String, format = "date")]
    pub end_date: NaiveDate,
}

/// The slice of a mandatory day the overlap check needs. Rows handed to
/// the validators are already audience-filtered (department or employee
/// match) by the query that produced them.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct MandatoryDayWindow {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// A stored record plus its employee assignments, as the duplicate check
/// compares them.
#[derive(Debug, Clone)]
pub struct MandatoryDaySnapshot {
    pub id: u64,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub employee_ids: Vec<u64>,
}
