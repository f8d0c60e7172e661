use crate::auth::auth::AuthUser;
use crate::model::mandatory_day::{MandatoryDay, MandatoryDaySnapshot};
use crate::validation;
use actix_web::{HttpResponse, Responder, web};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct SaveMandatoryDay {
    #[schema(example = "Year-End Freeze")]
    pub name: String,
    #[schema(example = "2025-12-29", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2025-12-31", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    /// Employees the window applies to. Required, never empty.
    #[schema(example = json!([4, 9]))]
    pub employee_ids: Vec<u64>,
    /// Whole departments the window applies to.
    #[serde(default)]
    #[schema(example = json!([10]))]
    pub department_ids: Vec<u64>,
}

#[derive(Deserialize, ToSchema)]
pub struct CheckMandatoryDay {
    #[schema(example = "2025-12-29", format = "date", value_type = String, nullable = true)]
    pub start_date: Option<NaiveDate>,
}

#[derive(Serialize, ToSchema)]
pub struct MandatoryDayDetail {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "Year-End Freeze")]
    pub name: String,
    #[schema(example = "2025-12-29", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2025-12-31", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = json!([4, 9]))]
    pub employee_ids: Vec<u64>,
    #[schema(example = json!([10]))]
    pub department_ids: Vec<u64>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct MandatoryDayFilter {
    /// Pagination page number (start with 1)
    #[schema(example = 1)]
    pub page: Option<u64>,
    /// Pagination per page number
    #[schema(example = 10)]
    pub per_page: Option<u64>,
}

#[derive(Serialize, ToSchema)]
pub struct MandatoryDayListResponse {
    pub data: Vec<MandatoryDay>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 1)]
    pub total: i64,
}

#[derive(sqlx::FromRow)]
struct SnapshotRow {
    id: u64,
    name: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    employee_id: Option<u64>,
}

/// All stored windows sharing `name`, with their employee assignments,
/// excluding the record being edited. Input to the duplicate check.
async fn snapshots_named(
    pool: &MySqlPool,
    name: &str,
    exclude_id: Option<u64>,
) -> Result<Vec<MandatoryDaySnapshot>, sqlx::Error> {
    let rows = sqlx::query_as::<_, SnapshotRow>(
        r#"
        SELECT md.id, md.name, md.start_date, md.end_date, mde.employee_id
        FROM mandatory_days md
        LEFT JOIN mandatory_day_employees mde ON mde.mandatory_day_id = md.id
        WHERE md.name = ? AND (? IS NULL OR md.id != ?)
        ORDER BY md.id
        "#,
    )
    .bind(name)
    .bind(exclude_id)
    .bind(exclude_id)
    .fetch_all(pool)
    .await?;

    let mut snapshots: Vec<MandatoryDaySnapshot> = Vec::new();
    for row in rows {
        match snapshots.last_mut() {
            Some(last) if last.id == row.id => {
                if let Some(emp) = row.employee_id {
                    last.employee_ids.push(emp);
                }
            }
            _ => snapshots.push(MandatoryDaySnapshot {
                id: row.id,
                name: row.name,
                start_date: row.start_date,
                end_date: row.end_date,
                employee_ids: row.employee_id.into_iter().collect(),
            }),
        }
    }
    Ok(snapshots)
}

async fn replace_assignments(
    tx: &mut sqlx::MySqlConnection,
    day_id: u64,
    employee_ids: &[u64],
    department_ids: &[u64],
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM mandatory_day_employees WHERE mandatory_day_id = ?")
        .bind(day_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM mandatory_day_departments WHERE mandatory_day_id = ?")
        .bind(day_id)
        .execute(&mut *tx)
        .await?;

    for employee_id in employee_ids {
        sqlx::query(
            "INSERT INTO mandatory_day_employees (mandatory_day_id, employee_id) VALUES (?, ?)",
        )
        .bind(day_id)
        .bind(employee_id)
        .execute(&mut *tx)
        .await?;
    }
    for department_id in department_ids {
        sqlx::query(
            "INSERT INTO mandatory_day_departments (mandatory_day_id, department_id) VALUES (?, ?)",
        )
        .bind(day_id)
        .bind(department_id)
        .execute(&mut *tx)
        .await?;
    }
    Ok(())
}

fn validate_shape(payload: &SaveMandatoryDay) -> Result<(), HttpResponse> {
    if payload.start_date > payload.end_date {
        return Err(HttpResponse::BadRequest().json(json!({
            "message": "start_date cannot be after end_date"
        })));
    }
    if payload.employee_ids.is_empty() {
        return Err(HttpResponse::BadRequest().json(json!({
            "message": "At least one employee is required"
        })));
    }
    Ok(())
}

/* =========================
Interactive start-date check
========================= */
/// Swagger doc for check_mandatory_day endpoint
#[utoipa::path(
    post,
    path = "/api/v1/mandatory-day/check",
    request_body = CheckMandatoryDay,
    responses(
        (status = 200, description = "No objection to the entered start date"),
        (status = 422, description = "Start date lies in the past; clear it", body = Object,
         example = json!({
            "error": "You selected 2025-11-30, which is in the past. Mandatory days must be scheduled for today or the future.",
            "reset_fields": ["start_date"]
         })
        ),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "MandatoryDay"
)]
pub async fn check_mandatory_day(
    _auth: AuthUser,
    payload: web::Json<CheckMandatoryDay>,
) -> actix_web::Result<impl Responder> {
    if let Some(start_date) = payload.start_date {
        validation::mandatory_day::reject_backdated_start(start_date, Utc::now().date_naive())?;
    }
    Ok(HttpResponse::Ok().json(json!({ "ok": true })))
}

/* =========================
Create mandatory day (officer/admin)
========================= */
/// Swagger doc for create_mandatory_day endpoint
#[utoipa::path(
    post,
    path = "/api/v1/mandatory-day",
    request_body = SaveMandatoryDay,
    responses(
        (status = 201, description = "Mandatory day created", body = Object,
         example = json!({ "id": 1, "message": "Mandatory day created" })),
        (status = 400, description = "Bad request"),
        (status = 409, description = "Duplicate of an existing record"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "MandatoryDay"
)]
pub async fn create_mandatory_day(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<SaveMandatoryDay>,
) -> actix_web::Result<impl Responder> {
    auth.require_officer_or_admin()?;

    if let Err(resp) = validate_shape(&payload) {
        return Ok(resp);
    }

    let existing = snapshots_named(pool.get_ref(), &payload.name, None)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch mandatory days for duplicate check");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    validation::mandatory_day::reject_duplicates(
        &payload.name,
        payload.start_date,
        payload.end_date,
        &payload.employee_ids,
        &existing,
    )?;

    let mut tx = pool.begin().await.map_err(|e| {
        error!(error = %e, "Failed to open transaction");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let insert = async {
        let result =
            sqlx::query("INSERT INTO mandatory_days (name, start_date, end_date) VALUES (?, ?, ?)")
                .bind(&payload.name)
                .bind(payload.start_date)
                .bind(payload.end_date)
                .execute(&mut *tx)
                .await?;
        let day_id = result.last_insert_id();
        replace_assignments(&mut tx, day_id, &payload.employee_ids, &payload.department_ids)
            .await?;
        Ok::<u64, sqlx::Error>(day_id)
    }
    .await;

    let day_id = match insert {
        Ok(id) => id,
        Err(e) => {
            error!(error = %e, "Failed to create mandatory day");
            return Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            })));
        }
    };

    tx.commit().await.map_err(|e| {
        error!(error = %e, "Failed to commit mandatory day");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Created().json(json!({
        "id": day_id,
        "message": "Mandatory day created"
    })))
}

/* =========================
Update mandatory day (officer/admin)
========================= */
/// Swagger doc for update_mandatory_day endpoint
#[utoipa::path(
    put,
    path = "/api/v1/mandatory-day/{id}",
    params(("id" = u64, Path, description = "Mandatory day to update")),
    request_body = SaveMandatoryDay,
    responses(
        (status = 200, description = "Mandatory day updated"),
        (status = 400, description = "Bad request"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Duplicate of an existing record"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "MandatoryDay"
)]
pub async fn update_mandatory_day(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<SaveMandatoryDay>,
) -> actix_web::Result<impl Responder> {
    auth.require_officer_or_admin()?;

    let day_id = path.into_inner();

    if let Err(resp) = validate_shape(&payload) {
        return Ok(resp);
    }

    let existing = snapshots_named(pool.get_ref(), &payload.name, Some(day_id))
        .await
        .map_err(|e| {
            error!(error = %e, day_id, "Failed to fetch mandatory days for duplicate check");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    validation::mandatory_day::reject_duplicates(
        &payload.name,
        payload.start_date,
        payload.end_date,
        &payload.employee_ids,
        &existing,
    )?;

    let mut tx = pool.begin().await.map_err(|e| {
        error!(error = %e, "Failed to open transaction");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let update = async {
        let result =
            sqlx::query("UPDATE mandatory_days SET name = ?, start_date = ?, end_date = ? WHERE id = ?")
                .bind(&payload.name)
                .bind(payload.start_date)
                .bind(payload.end_date)
                .bind(day_id)
                .execute(&mut *tx)
                .await?;
        if result.rows_affected() == 0 {
            return Ok(false);
        }
        replace_assignments(&mut tx, day_id, &payload.employee_ids, &payload.department_ids)
            .await?;
        Ok::<bool, sqlx::Error>(true)
    }
    .await;

    match update {
        Ok(true) => {}
        Ok(false) => {
            return Ok(HttpResponse::NotFound().json(json!({
                "message": "Mandatory day not found"
            })));
        }
        Err(e) => {
            error!(error = %e, day_id, "Failed to update mandatory day");
            return Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            })));
        }
    }

    tx.commit().await.map_err(|e| {
        error!(error = %e, "Failed to commit mandatory day update");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Mandatory day updated" })))
}

/* =========================
Get one mandatory day
========================= */
/// Swagger doc for get_mandatory_day endpoint
#[utoipa::path(
    get,
    path = "/api/v1/mandatory-day/{id}",
    params(("id" = u64, Path, description = "Mandatory day to fetch")),
    responses(
        (status = 200, description = "Mandatory day found", body = MandatoryDayDetail),
        (status = 404, description = "Not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "MandatoryDay"
)]
pub async fn get_mandatory_day(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let day_id = path.into_inner();

    let day = sqlx::query_as::<_, MandatoryDay>(
        "SELECT id, name, start_date, end_date FROM mandatory_days WHERE id = ?",
    )
    .bind(day_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, day_id, "Failed to fetch mandatory day");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let Some(day) = day else {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Mandatory day not found"
        })));
    };

    let employee_ids = sqlx::query_scalar::<_, u64>(
        "SELECT employee_id FROM mandatory_day_employees WHERE mandatory_day_id = ? ORDER BY employee_id",
    )
    .bind(day_id)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, day_id, "Failed to fetch employee assignments");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let department_ids = sqlx::query_scalar::<_, u64>(
        "SELECT department_id FROM mandatory_day_departments WHERE mandatory_day_id = ? ORDER BY department_id",
    )
    .bind(day_id)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, day_id, "Failed to fetch department assignments");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(MandatoryDayDetail {
        id: day.id,
        name: day.name,
        start_date: day.start_date,
        end_date: day.end_date,
        employee_ids,
        department_ids,
    }))
}

/* =========================
List mandatory days
========================= */
/// Swagger doc for mandatory_day_list endpoint
#[utoipa::path(
    get,
    path = "/api/v1/mandatory-day",
    params(MandatoryDayFilter),
    responses(
        (status = 200, description = "Paginated mandatory day list", body = MandatoryDayListResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "MandatoryDay"
)]
pub async fn mandatory_day_list(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<MandatoryDayFilter>,
) -> actix_web::Result<impl Responder> {
    let per_page = query.per_page.unwrap_or(10).min(100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM mandatory_days")
        .fetch_one(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to count mandatory days");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let data = sqlx::query_as::<_, MandatoryDay>(
        r#"
        SELECT id, name, start_date, end_date
        FROM mandatory_days
        ORDER BY start_date, id
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(per_page)
    .bind(offset)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch mandatory day list");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(MandatoryDayListResponse {
        data,
        page: page as u32,
        per_page: per_page as u32,
        total,
    }))
}
