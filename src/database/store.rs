use async_trait::async_trait;

use super::manager::DatabaseError;
use super::models::{Customer, Employee, NewTicket, ServiceTicket, StatusFilter, TicketAssignment, User};

/// Persistence operations the HTTP handlers rely on.
///
/// Lookups by id return `DatabaseError::NotFound` when the row is absent.
/// Lookups by a foreign identity (`customer_for_user`, `find_user`) return
/// `Ok(None)` instead, leaving the decision to the caller.
#[async_trait]
pub trait RepairsStore: Send + Sync {
    /// Tickets matching `filter`, ordered by id
    async fn list_tickets(&self, filter: StatusFilter) -> Result<Vec<ServiceTicket>, DatabaseError>;

    async fn get_ticket(&self, id: i64) -> Result<ServiceTicket, DatabaseError>;

    /// Persist a new unassigned, incomplete ticket
    async fn create_ticket(&self, ticket: NewTicket) -> Result<ServiceTicket, DatabaseError>;

    /// Overwrite employee and completion date on an existing ticket
    async fn assign_ticket(&self, id: i64, assignment: TicketAssignment) -> Result<(), DatabaseError>;

    async fn delete_ticket(&self, id: i64) -> Result<(), DatabaseError>;

    async fn list_customers(&self) -> Result<Vec<Customer>, DatabaseError>;

    async fn get_customer(&self, id: i64) -> Result<Customer, DatabaseError>;

    async fn customer_for_user(&self, user_id: i64) -> Result<Option<Customer>, DatabaseError>;

    async fn list_employees(&self) -> Result<Vec<Employee>, DatabaseError>;

    async fn get_employee(&self, id: i64) -> Result<Employee, DatabaseError>;

    async fn find_user(&self, user_id: i64) -> Result<Option<User>, DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;
}
