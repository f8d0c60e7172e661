use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 4,
        "employee_code": "EMP-004",
        "first_name": "Amina",
        "last_name": "Rahman",
        "email": "amina.rahman@company.com",
        "department_id": 10,
        "hire_date": "2023-06-12",
        "status": "active"
    })
)]
pub struct Employee {
    pub id: u64,
    pub employee_code: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Department membership drives department-scoped mandatory days.
    pub department_id: u64,
    #[schema(value_type = String, format = "date")]
    pub hire_date: NaiveDate,
    pub status: String,
}
