use crate::auth::auth::AuthUser;
use crate::model::leave_request::{LeaveRequest, LeaveState};
use crate::model::mandatory_day::MandatoryDayWindow;
use crate::validation;
use actix_web::{HttpResponse, Responder, web};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{MySqlPool, prelude::FromRow};
use tracing::error;
use utoipa::{IntoParams, ToSchema};

#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LeaveType {
    Annual,
    Sick,
    Unpaid,
}

impl LeaveType {
    fn as_str(&self) -> &str {
        match self {
            LeaveType::Annual => "annual",
            LeaveType::Sick => "sick",
            LeaveType::Unpaid => "unpaid",
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct CreateLeave {
    #[schema(example = "2026-01-05T09:00:00", format = "date-time", value_type = String)]
    pub date_from: NaiveDateTime,
    #[schema(example = "2026-01-07T18:00:00", format = "date-time", value_type = String)]
    pub date_to: NaiveDateTime,
    #[schema(example = "annual")]
    pub leave_type: LeaveType,
}

/// What a form sends while the user is still editing. Anything may be
/// missing; the overlap check only runs once employee and both dates are
/// present.
#[derive(Deserialize, ToSchema)]
pub struct CheckLeave {
    /// Defaults to the caller's own employee record.
    #[schema(example = 4, nullable = true)]
    pub employee_id: Option<u64>,
    #[schema(example = "2025-12-30T09:00:00", format = "date-time", value_type = String, nullable = true)]
    pub date_from: Option<NaiveDateTime>,
    #[schema(example = "2026-01-02T18:00:00", format = "date-time", value_type = String, nullable = true)]
    pub date_to: Option<NaiveDateTime>,
}

#[derive(Deserialize, ToSchema)]
pub struct DeleteLeaveBatch {
    #[schema(example = json!([1, 2, 3]))]
    pub ids: Vec<u64>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct LeaveFilter {
    /// Filter by employee ID
    #[schema(example = 4)]
    pub employee_id: Option<u64>,
    /// Filter by request state
    #[schema(example = "draft")]
    pub state: Option<String>,
    /// Pagination page number (start with 1)
    #[schema(example = 1)]
    pub page: Option<u64>,
    /// Pagination per page number
    #[schema(example = 10)]
    pub per_page: Option<u64>,
}

// Helper enum for typed SQLx binding
enum FilterValue<'a> {
    U64(u64),
    Str(&'a str),
}

#[derive(Serialize, Deserialize, FromRow, ToSchema)]
pub struct LeaveResponse {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 4)]
    pub employee_id: u64,
    #[schema(example = "2026-01-05T09:00:00", format = "date-time", value_type = String)]
    pub date_from: NaiveDateTime,
    #[schema(example = "2026-01-07T18:00:00", format = "date-time", value_type = String)]
    pub date_to: NaiveDateTime,
    #[schema(example = "annual", value_type = String)]
    pub leave_type: String,
    #[schema(example = "draft", value_type = String)]
    pub state: String,
    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, ToSchema)]
pub struct LeaveListResponse {
    pub data: Vec<LeaveResponse>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 1)]
    pub total: i64,
}

#[derive(FromRow)]
struct EmployeeRef {
    id: u64,
    department_id: u64,
}

async fn employee_ref(
    pool: &MySqlPool,
    employee_id: u64,
) -> Result<Option<EmployeeRef>, sqlx::Error> {
    sqlx::query_as::<_, EmployeeRef>("SELECT id, department_id FROM employees WHERE id = ?")
        .bind(employee_id)
        .fetch_optional(pool)
        .await
}

/// Mandatory days applying to this employee, either through one of their
/// departments or through a direct assignment. Date filtering happens in
/// the validators.
async fn windows_for(
    pool: &MySqlPool,
    employee: &EmployeeRef,
) -> Result<Vec<MandatoryDayWindow>, sqlx::Error> {
    sqlx::query_as::<_, MandatoryDayWindow>(
        r#"
        SELECT DISTINCT md.name, md.start_date, md.end_date
        FROM mandatory_days md
        LEFT JOIN mandatory_day_departments mdd ON mdd.mandatory_day_id = md.id
        LEFT JOIN mandatory_day_employees mde ON mde.mandatory_day_id = md.id
        WHERE mdd.department_id = ? OR mde.employee_id = ?
        ORDER BY md.start_date, md.name
        "#,
    )
    .bind(employee.department_id)
    .bind(employee.id)
    .fetch_all(pool)
    .await
}

fn internal_error(e: sqlx::Error, context: &'static str) -> actix_web::Error {
    error!(error = %e, "{}", context);
    actix_web::error::ErrorInternalServerError("Internal Server Error")
}

/// The save-time backstop: refuses the write if the period touches a
/// mandatory day for this employee. Runs on create, confirm and approve,
/// with no privilege bypass.
async fn enforce_mandatory_days(
    pool: &MySqlPool,
    employee_id: u64,
    date_from: NaiveDateTime,
    date_to: NaiveDateTime,
) -> actix_web::Result<()> {
    let employee = employee_ref(pool, employee_id)
        .await
        .map_err(|e| internal_error(e, "Failed to fetch employee"))?
        .ok_or_else(|| actix_web::error::ErrorBadRequest("Unknown employee"))?;

    let windows = windows_for(pool, &employee)
        .await
        .map_err(|e| internal_error(e, "Failed to fetch mandatory days"))?;

    validation::leave::enforce_no_overlap(&windows, date_from, date_to)?;
    Ok(())
}

async fn leave_row(pool: &MySqlPool, leave_id: u64) -> actix_web::Result<Option<LeaveRequest>> {
    sqlx::query_as::<_, LeaveRequest>(
        "SELECT id, employee_id, date_from, date_to, leave_type, state FROM leave_requests WHERE id = ?",
    )
    .bind(leave_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| internal_error(e, "Failed to fetch leave request"))
}

/* =========================
Interactive check (advisory phase)
========================= */
/// Swagger doc for check_leave endpoint
#[utoipa::path(
    post,
    path = "/api/v1/leave/check",
    request_body = CheckLeave,
    responses(
        (status = 200, description = "No objection to the entered values"),
        (status = 422, description = "A field was rejected; clear the listed fields", body = Object,
         example = json!({
            "error": "The selected period overlaps with the following Mandatory Day(s):\n\n- Year-End Freeze (From 2025-12-29 To 2025-12-31)\n\nPlease choose a different period.",
            "reset_fields": ["date_from", "date_to"]
         })
        ),
        (status = 400, description = "Unknown employee"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn check_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CheckLeave>,
) -> actix_web::Result<impl Responder> {
    let today = Utc::now().date_naive();

    // Past dates are judged per field and never bypassed.
    validation::leave::reject_past_dates(payload.date_from, payload.date_to, today)?;

    let employee_id = payload.employee_id.or(auth.employee_id);
    let (Some(employee_id), Some(date_from), Some(date_to)) =
        (employee_id, payload.date_from, payload.date_to)
    else {
        // Incomplete input, nothing further to judge yet.
        return Ok(HttpResponse::Ok().json(serde_json::json!({ "ok": true })));
    };

    // Officers see no advisory warning at all. The save-time backstop
    // still applies when they submit.
    if auth.can_bypass_mandatory_days() {
        return Ok(HttpResponse::Ok().json(serde_json::json!({ "ok": true })));
    }

    let employee = employee_ref(pool.get_ref(), employee_id)
        .await
        .map_err(|e| internal_error(e, "Failed to fetch employee"))?
        .ok_or_else(|| actix_web::error::ErrorBadRequest("Unknown employee"))?;

    let windows = windows_for(pool.get_ref(), &employee)
        .await
        .map_err(|e| internal_error(e, "Failed to fetch mandatory days"))?;

    validation::leave::reject_overlaps(&windows, date_from, date_to)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "ok": true })))
}

/* =========================
Create leave request
========================= */
/// Swagger doc for create_leave endpoint
#[utoipa::path(
    post,
    path = "/api/v1/leave",
    request_body(
        content = CreateLeave,
        description = "Leave request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Leave request submitted successfully",
         body = Object,
         example = json!({
            "message": "Leave request submitted",
            "state": "draft"
         })
        ),
        (status = 400, description = "Bad request"),
        (status = 409, description = "Period falls on a mandatory day"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn create_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateLeave>,
) -> actix_web::Result<impl Responder> {
    let employee_id: u64 = auth
        .employee_id
        .ok_or_else(|| actix_web::error::ErrorForbidden("No employee profile"))?;

    if payload.date_from > payload.date_to {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "date_from cannot be after date_to"
        })));
    }

    enforce_mandatory_days(pool.get_ref(), employee_id, payload.date_from, payload.date_to)
        .await?;

    sqlx::query(
        r#"
        INSERT INTO leave_requests
            (employee_id, date_from, date_to, leave_type, state)
        VALUES (?, ?, ?, ?, 'draft')
        "#,
    )
    .bind(employee_id)
    .bind(payload.date_from)
    .bind(payload.date_to)
    .bind(payload.leave_type.as_str())
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, employee_id, "Failed to create leave request");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Leave request submitted",
        "state": "draft"
    })))
}

async fn transition(
    pool: &MySqlPool,
    leave_id: u64,
    from_states: &[&str],
    to_state: &str,
) -> actix_web::Result<bool> {
    let placeholders = from_states.iter().map(|_| "?").collect::<Vec<_>>().join(", ");
    let sql = format!(
        "UPDATE leave_requests SET state = ? WHERE id = ? AND state IN ({placeholders})"
    );

    let mut q = sqlx::query(&sql).bind(to_state).bind(leave_id);
    for state in from_states {
        q = q.bind(*state);
    }

    let result = q
        .execute(pool)
        .await
        .map_err(|e| internal_error(e, "Failed to update leave state"))?;

    Ok(result.rows_affected() > 0)
}

/* =========================
Confirm leave (owner or officer)
========================= */
/// Swagger doc for confirm_leave endpoint
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/confirm",
    params(("leave_id" = u64, Path, description = "ID of the leave request to confirm")),
    responses(
        (status = 200, description = "Leave confirmed", body = Object, example = json!({
            "message": "Leave confirmed"
        })),
        (status = 400, description = "Leave request not found or already processed"),
        (status = 409, description = "Period falls on a mandatory day"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn confirm_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let leave_id = path.into_inner();

    let Some(row) = leave_row(pool.get_ref(), leave_id).await? else {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Leave request not found or already processed"
        })));
    };

    if auth.employee_id != Some(row.employee_id) {
        auth.require_officer_or_admin()?;
    }

    // The backstop fires even on confirm.
    enforce_mandatory_days(pool.get_ref(), row.employee_id, row.date_from, row.date_to).await?;

    if !transition(pool.get_ref(), leave_id, &["draft"], "confirmed").await? {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Leave request not found or already processed"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Leave confirmed" })))
}

/* =========================
Approve leave (officer/admin)
========================= */
/// Swagger doc for approve_leave endpoint
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/approve",
    params(("leave_id" = u64, Path, description = "ID of the leave request to approve")),
    responses(
        (status = 200, description = "Leave approved successfully", body = Object, example = json!({
            "message": "Leave approved"
        })),
        (status = 400, description = "Leave request not found or already processed"),
        (status = 409, description = "Period falls on a mandatory day"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn approve_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_officer_or_admin()?;

    let leave_id = path.into_inner();

    let Some(row) = leave_row(pool.get_ref(), leave_id).await? else {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Leave request not found or already processed"
        })));
    };

    enforce_mandatory_days(pool.get_ref(), row.employee_id, row.date_from, row.date_to).await?;

    if !transition(pool.get_ref(), leave_id, &["confirmed"], "approved").await? {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Leave request not found or already processed"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Leave approved" })))
}

/* =========================
Refuse leave (officer/admin)
========================= */
/// Swagger doc for refuse_leave endpoint
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/refuse",
    params(("leave_id" = u64, Path, description = "ID of the leave request to refuse")),
    responses(
        (status = 200, description = "Leave refused", body = Object, example = json!({
            "message": "Leave refused"
        })),
        (status = 400, description = "Leave request not found or already processed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn refuse_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_officer_or_admin()?;

    let leave_id = path.into_inner();

    // No mandatory-day re-check here: refusing retires the request.
    if !transition(pool.get_ref(), leave_id, &["confirmed", "approved"], "refused").await? {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Leave request not found or already processed"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Leave refused" })))
}

/* =========================
Cancel leave (owner or officer)
========================= */
/// Swagger doc for cancel_leave endpoint
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/cancel",
    params(("leave_id" = u64, Path, description = "ID of the leave request to cancel")),
    responses(
        (status = 200, description = "Leave cancelled", body = Object, example = json!({
            "message": "Leave cancelled"
        })),
        (status = 400, description = "Leave request not found or already processed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn cancel_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let leave_id = path.into_inner();

    let Some(row) = leave_row(pool.get_ref(), leave_id).await? else {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Leave request not found or already processed"
        })));
    };

    if auth.employee_id != Some(row.employee_id) {
        auth.require_officer_or_admin()?;
    }

    if !transition(
        pool.get_ref(),
        leave_id,
        &["draft", "confirmed", "approved"],
        "cancelled",
    )
    .await?
    {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Leave request not found or already processed"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Leave cancelled" })))
}

async fn delete_requests(
    auth: &AuthUser,
    pool: &MySqlPool,
    ids: &[u64],
) -> actix_web::Result<HttpResponse> {
    if ids.is_empty() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "No leave requests given"
        })));
    }

    let placeholders = ids.iter().map(|_| "?").collect::<Vec<_>>().join(", ");
    let sql = format!(
        "SELECT id, employee_id, date_from, date_to, leave_type, state FROM leave_requests WHERE id IN ({placeholders})"
    );

    let mut q = sqlx::query_as::<_, LeaveRequest>(&sql);
    for id in ids {
        q = q.bind(*id);
    }

    let rows = q
        .fetch_all(pool)
        .await
        .map_err(|e| internal_error(e, "Failed to fetch leave requests for deletion"))?;

    if rows.len() != ids.len() {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "One or more leave requests not found"
        })));
    }

    let is_officer = auth.require_officer_or_admin().is_ok();
    if !is_officer && rows.iter().any(|r| Some(r.employee_id) != auth.employee_id) {
        return Err(actix_web::error::ErrorForbidden(
            "You may only delete your own leave requests",
        ));
    }

    let mut states: Vec<(u64, LeaveState)> = Vec::with_capacity(rows.len());
    for row in &rows {
        let state = row.state.parse::<LeaveState>().map_err(|_| {
            error!(leave_id = row.id, state = %row.state, "Unknown leave state in store");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;
        states.push((row.id, state));
    }

    // All-or-nothing: one offending record fails the whole batch before
    // anything is removed.
    validation::leave::enforce_deletable(&states)?;

    let sql = format!("DELETE FROM leave_requests WHERE id IN ({placeholders})");
    let mut q = sqlx::query(&sql);
    for id in ids {
        q = q.bind(*id);
    }

    let result = q
        .execute(pool)
        .await
        .map_err(|e| internal_error(e, "Failed to delete leave requests"))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "deleted": result.rows_affected()
    })))
}

/* =========================
Delete one leave request
========================= */
/// Swagger doc for delete_leave endpoint
#[utoipa::path(
    delete,
    path = "/api/v1/leave/{leave_id}",
    params(("leave_id" = u64, Path, description = "ID of the leave request to delete")),
    responses(
        (status = 200, description = "Leave request deleted", body = Object, example = json!({
            "deleted": 1
        })),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Request is in a non-deletable state"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn delete_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let leave_id = path.into_inner();
    delete_requests(&auth, pool.get_ref(), &[leave_id]).await
}

/* =========================
Delete a batch of leave requests
========================= */
/// Swagger doc for delete_leave_batch endpoint
#[utoipa::path(
    delete,
    path = "/api/v1/leave",
    request_body = DeleteLeaveBatch,
    responses(
        (status = 200, description = "All targeted leave requests deleted", body = Object, example = json!({
            "deleted": 3
        })),
        (status = 404, description = "One or more leave requests not found"),
        (status = 409, description = "A request in the batch is in a non-deletable state; nothing was deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn delete_leave_batch(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<DeleteLeaveBatch>,
) -> actix_web::Result<impl Responder> {
    delete_requests(&auth, pool.get_ref(), &payload.ids).await
}

/* =========================
Get one leave request
========================= */
/// Swagger doc for get_leave endpoint
#[utoipa::path(
    get,
    path = "/api/v1/leave/{leave_id}",
    params(("leave_id" = u64, Path, description = "ID of the leave request to fetch")),
    responses(
        (status = 200, description = "Leave request found", body = LeaveResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn get_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let leave_id = path.into_inner();

    let leave = sqlx::query_as::<_, LeaveResponse>(
        r#"
        SELECT id, employee_id, date_from, date_to, leave_type, state, created_at
        FROM leave_requests
        WHERE id = ?
        "#,
    )
    .bind(leave_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| internal_error(e, "Failed to fetch leave request"))?;

    match leave {
        Some(data) => {
            if auth.employee_id != Some(data.employee_id) {
                auth.require_officer_or_admin()?;
            }
            Ok(HttpResponse::Ok().json(data))
        }
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Leave request not found"
        }))),
    }
}

/* =========================
List leave requests (officer/admin)
========================= */
/// Swagger doc for leave_list endpoint
#[utoipa::path(
    get,
    path = "/api/v1/leave",
    params(LeaveFilter),
    responses(
        (status = 200, description = "Paginated leave list", body = LeaveListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn leave_list(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<LeaveFilter>,
) -> actix_web::Result<impl Responder> {
    auth.require_officer_or_admin()?;

    // -------------------------
    // Pagination
    // -------------------------
    let per_page = query.per_page.unwrap_or(10).min(100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    // -------------------------
    // WHERE clause
    // -------------------------
    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(emp_id) = query.employee_id {
        where_sql.push_str(" AND employee_id = ?");
        args.push(FilterValue::U64(emp_id));
    }

    if let Some(state) = query.state.as_deref() {
        where_sql.push_str(" AND state = ?");
        args.push(FilterValue::Str(state));
    }

    // -------------------------
    // COUNT query
    // -------------------------
    let count_sql = format!("SELECT COUNT(*) FROM leave_requests{}", where_sql);

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::U64(v) => count_q.bind(*v),
            FilterValue::Str(s) => count_q.bind(*s),
        };
    }

    let total = count_q
        .fetch_one(pool.get_ref())
        .await
        .map_err(|e| internal_error(e, "Failed to count leave requests"))?;

    // -------------------------
    // DATA query
    // -------------------------
    let data_sql = format!(
        r#"
        SELECT id, employee_id, date_from, date_to, leave_type, state, created_at
        FROM leave_requests
        {}
        ORDER BY created_at DESC
        LIMIT ? OFFSET ?
        "#,
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, LeaveResponse>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::U64(v) => data_q.bind(v),
            FilterValue::Str(s) => data_q.bind(s),
        };
    }

    let leaves = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| internal_error(e, "Failed to fetch leave list"))?;

    // -------------------------
    // Response
    // -------------------------
    let response = LeaveListResponse {
        data: leaves,
        page: page as u32,
        per_page: per_page as u32,
        total,
    };

    Ok(HttpResponse::Ok().json(response))
}
