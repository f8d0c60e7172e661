use crate::api::employee::{CreateEmployee, EmployeeFilter, EmployeeListResponse};
use crate::api::leave_request::{
    CheckLeave, CreateLeave, DeleteLeaveBatch, LeaveFilter, LeaveListResponse, LeaveResponse,
};
use crate::api::mandatory_day::{
    CheckMandatoryDay, MandatoryDayDetail, MandatoryDayFilter, MandatoryDayListResponse,
    SaveMandatoryDay,
};
use crate::model::department::Department;
use crate::model::employee::Employee;
use crate::model::leave_request::LeaveState;
use crate::model::mandatory_day::MandatoryDay;
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Leave Policy API",
        version = "1.0.0",
        description = r#"
## Mandatory-Day Leave Restriction Service

This API manages company-wide **mandatory days** (leave-restricted date
ranges scoped to employees or departments) and guards time-off requests
against them.

### 🔹 Key Features
- **Mandatory Days**
  - Define, update and list restricted windows with employee and department assignments
  - Duplicate records (same name, same dates, shared employees) are refused
- **Leave Requests**
  - Submit, confirm, approve, refuse, cancel and delete time-off requests
  - Interactive `check` endpoints mirror form editing: rejected fields are
    returned in `reset_fields` so the client can clear them
  - A non-bypassable save-time backstop refuses any period touching a
    mandatory day, even on confirm/approve
- **Deletion policy**
  - Only draft, cancelled or refused requests can be deleted; batches are
    all-or-nothing

### 🔐 Security
Endpoints are protected using **JWT Bearer authentication**. Time-off
officers and admins skip the advisory overlap warning; nobody skips the
save-time backstop.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::leave_request::check_leave,
        crate::api::leave_request::create_leave,
        crate::api::leave_request::confirm_leave,
        crate::api::leave_request::approve_leave,
        crate::api::leave_request::refuse_leave,
        crate::api::leave_request::cancel_leave,
        crate::api::leave_request::delete_leave,
        crate::api::leave_request::delete_leave_batch,
        crate::api::leave_request::get_leave,
        crate::api::leave_request::leave_list,

        crate::api::mandatory_day::check_mandatory_day,
        crate::api::mandatory_day::create_mandatory_day,
        crate::api::mandatory_day::update_mandatory_day,
        crate::api::mandatory_day::get_mandatory_day,
        crate::api::mandatory_day::mandatory_day_list,

        crate::api::employee::create_employee,
        crate::api::employee::get_employee,
        crate::api::employee::list_employees,
        crate::api::employee::list_departments
    ),
    components(
        schemas(
            CheckLeave,
            CreateLeave,
            DeleteLeaveBatch,
            LeaveFilter,
            LeaveResponse,
            LeaveListResponse,
            LeaveState,
            CheckMandatoryDay,
            SaveMandatoryDay,
            MandatoryDay,
            MandatoryDayDetail,
            MandatoryDayFilter,
            MandatoryDayListResponse,
            CreateEmployee,
            Department,
            Employee,
            EmployeeFilter,
            EmployeeListResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "MandatoryDay", description = "Mandatory day management APIs"),
        (name = "Leave", description = "Leave management APIs"),
        (name = "Employee", description = "Employee directory APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
