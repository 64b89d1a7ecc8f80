use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;

use super::{Customer, Employee};

/// Message returned for an unrecognized `status` query value
pub const INVALID_STATUS_MESSAGE: &str =
    r#"Invalid-status must be equal to "done", "all", "unclaimed", or "inprogress"."#;

/// Ticket lifecycle label computed from `date_completed` and `employee`.
/// Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    Done,
    Unclaimed,
    InProgress,
}

impl TicketStatus {
    /// A completion date wins over assignment: a completed ticket is done
    /// whether or not an employee is attached.
    pub fn derive(date_completed: Option<NaiveDate>, has_employee: bool) -> Self {
        match (date_completed, has_employee) {
            (Some(_), _) => TicketStatus::Done,
            (None, false) => TicketStatus::Unclaimed,
            (None, true) => TicketStatus::InProgress,
        }
    }
}

/// Value of the `status` query parameter on the ticket list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Done,
    Unclaimed,
    InProgress,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidStatusFilter(pub String);

impl std::fmt::Display for InvalidStatusFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(INVALID_STATUS_MESSAGE)
    }
}

impl std::error::Error for InvalidStatusFilter {}

impl FromStr for StatusFilter {
    type Err = InvalidStatusFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(StatusFilter::All),
            "done" => Ok(StatusFilter::Done),
            "unclaimed" => Ok(StatusFilter::Unclaimed),
            "inprogress" => Ok(StatusFilter::InProgress),
            other => Err(InvalidStatusFilter(other.to_string())),
        }
    }
}

impl StatusFilter {
    /// Absent or empty parameter means no filtering
    pub fn from_query(param: Option<&str>) -> Result<Self, InvalidStatusFilter> {
        match param {
            None | Some("") => Ok(StatusFilter::All),
            Some(value) => value.parse(),
        }
    }

    pub fn matches(self, status: TicketStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Done => status == TicketStatus::Done,
            StatusFilter::Unclaimed => status == TicketStatus::Unclaimed,
            StatusFilter::InProgress => status == TicketStatus::InProgress,
        }
    }

    /// WHERE clause over the `service_tickets t` alias. Must agree with `matches`.
    pub fn sql_predicate(self) -> &'static str {
        match self {
            StatusFilter::All => "TRUE",
            StatusFilter::Done => "t.date_completed IS NOT NULL",
            StatusFilter::Unclaimed => "t.date_completed IS NULL AND t.employee_id IS NULL",
            StatusFilter::InProgress => "t.date_completed IS NULL AND t.employee_id IS NOT NULL",
        }
    }
}

/// Service ticket with its customer and employee nested one level deep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceTicket {
    pub id: i64,
    pub description: String,
    pub emergency: bool,
    pub date_completed: Option<NaiveDate>,
    pub customer: Customer,
    pub employee: Option<Employee>,
}

impl ServiceTicket {
    pub fn status(&self) -> TicketStatus {
        TicketStatus::derive(self.date_completed, self.employee.is_some())
    }
}

/// Fields supplied when a customer files a ticket
#[derive(Debug, Clone)]
pub struct NewTicket {
    pub customer_id: i64,
    pub description: String,
    pub emergency: bool,
}

/// Staff update: who handles the ticket and when it was finished
#[derive(Debug, Clone, Copy)]
pub struct TicketAssignment {
    pub employee_id: i64,
    pub date_completed: Option<NaiveDate>,
}

/// Flat row produced by the joined ticket query
#[derive(Debug, FromRow)]
pub(crate) struct TicketRow {
    pub id: i64,
    pub description: String,
    pub emergency: bool,
    pub date_completed: Option<NaiveDate>,
    pub customer_id: i64,
    pub customer_user_id: i64,
    pub customer_address: String,
    pub customer_full_name: String,
    pub employee_id: Option<i64>,
    pub employee_user_id: Option<i64>,
    pub employee_specialty: Option<String>,
    pub employee_full_name: Option<String>,
}

impl From<TicketRow> for ServiceTicket {
    fn from(row: TicketRow) -> Self {
        let employee = match (row.employee_id, row.employee_user_id) {
            (Some(id), Some(user_id)) => Some(Employee {
                id,
                user_id,
                specialty: row.employee_specialty.unwrap_or_default(),
                full_name: row.employee_full_name.unwrap_or_default(),
            }),
            _ => None,
        };

        ServiceTicket {
            id: row.id,
            description: row.description,
            emergency: row.emergency,
            date_completed: row.date_completed,
            customer: Customer {
                id: row.customer_id,
                user_id: row.customer_user_id,
                address: row.customer_address,
                full_name: row.customer_full_name,
            },
            employee,
        }
    }
}
