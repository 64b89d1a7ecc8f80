//! In-process store backed by ordered maps. Used by the test suite to drive
//! the full router without a database.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::manager::DatabaseError;
use super::models::{Customer, Employee, NewTicket, ServiceTicket, StatusFilter, TicketAssignment, User};
use super::store::RepairsStore;

#[derive(Debug, Clone)]
struct TicketEntry {
    id: i64,
    customer_id: i64,
    employee_id: Option<i64>,
    description: String,
    emergency: bool,
    date_completed: Option<NaiveDate>,
}

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    customers: BTreeMap<i64, Customer>,
    employees: BTreeMap<i64, Employee>,
    tickets: BTreeMap<i64, TicketEntry>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn materialize(&self, entry: &TicketEntry) -> Result<ServiceTicket, DatabaseError> {
        let customer = self
            .customers
            .get(&entry.customer_id)
            .cloned()
            .ok_or_else(|| DatabaseError::NotFound(format!("customer {} not found", entry.customer_id)))?;
        let employee = match entry.employee_id {
            Some(id) => Some(
                self.employees
                    .get(&id)
                    .cloned()
                    .ok_or_else(|| DatabaseError::NotFound(format!("employee {} not found", id)))?,
            ),
            None => None,
        };

        Ok(ServiceTicket {
            id: entry.id,
            description: entry.description.clone(),
            emergency: entry.emergency,
            date_completed: entry.date_completed,
            customer,
            employee,
        })
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_user(&self, username: &str, first_name: &str, last_name: &str, is_staff: bool) -> User {
        let mut tables = self.tables.write().await;
        let user = User {
            id: tables.next_id(),
            username: username.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            is_staff,
            is_active: true,
        };
        tables.users.insert(user.id, user.clone());
        user
    }

    pub async fn deactivate_user(&self, user_id: i64) {
        if let Some(user) = self.tables.write().await.users.get_mut(&user_id) {
            user.is_active = false;
        }
    }

    pub async fn add_customer(&self, user: &User, address: &str) -> Customer {
        let mut tables = self.tables.write().await;
        let customer = Customer {
            id: tables.next_id(),
            user_id: user.id,
            address: address.to_string(),
            full_name: user.full_name(),
        };
        tables.customers.insert(customer.id, customer.clone());
        customer
    }

    pub async fn add_employee(&self, user: &User, specialty: &str) -> Employee {
        let mut tables = self.tables.write().await;
        let employee = Employee {
            id: tables.next_id(),
            user_id: user.id,
            specialty: specialty.to_string(),
            full_name: user.full_name(),
        };
        tables.employees.insert(employee.id, employee.clone());
        employee
    }

    pub async fn ticket_count(&self) -> usize {
        self.tables.read().await.tickets.len()
    }
}

#[async_trait]
impl RepairsStore for MemoryStore {
    async fn list_tickets(&self, filter: StatusFilter) -> Result<Vec<ServiceTicket>, DatabaseError> {
        let tables = self.tables.read().await;
        let mut tickets = Vec::new();
        for entry in tables.tickets.values() {
            let ticket = tables.materialize(entry)?;
            if filter.matches(ticket.status()) {
                tickets.push(ticket);
            }
        }
        Ok(tickets)
    }

    async fn get_ticket(&self, id: i64) -> Result<ServiceTicket, DatabaseError> {
        let tables = self.tables.read().await;
        let entry = tables
            .tickets
            .get(&id)
            .ok_or_else(|| DatabaseError::NotFound(format!("service ticket {} not found", id)))?;
        tables.materialize(entry)
    }

    async fn create_ticket(&self, ticket: NewTicket) -> Result<ServiceTicket, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.customers.contains_key(&ticket.customer_id) {
            return Err(DatabaseError::NotFound(format!("customer {} not found", ticket.customer_id)));
        }

        let entry = TicketEntry {
            id: tables.next_id(),
            customer_id: ticket.customer_id,
            employee_id: None,
            description: ticket.description,
            emergency: ticket.emergency,
            date_completed: None,
        };
        let created = tables.materialize(&entry)?;
        tables.tickets.insert(entry.id, entry);
        Ok(created)
    }

    async fn assign_ticket(&self, id: i64, assignment: TicketAssignment) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.employees.contains_key(&assignment.employee_id) {
            return Err(DatabaseError::NotFound(format!("employee {} not found", assignment.employee_id)));
        }

        let entry = tables
            .tickets
            .get_mut(&id)
            .ok_or_else(|| DatabaseError::NotFound(format!("service ticket {} not found", id)))?;
        entry.employee_id = Some(assignment.employee_id);
        entry.date_completed = assignment.date_completed;
        Ok(())
    }

    async fn delete_ticket(&self, id: i64) -> Result<(), DatabaseError> {
        self.tables
            .write()
            .await
            .tickets
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DatabaseError::NotFound(format!("service ticket {} not found", id)))
    }

    async fn list_customers(&self) -> Result<Vec<Customer>, DatabaseError> {
        Ok(self.tables.read().await.customers.values().cloned().collect())
    }

    async fn get_customer(&self, id: i64) -> Result<Customer, DatabaseError> {
        self.tables
            .read()
            .await
            .customers
            .get(&id)
            .cloned()
            .ok_or_else(|| DatabaseError::NotFound(format!("customer {} not found", id)))
    }

    async fn customer_for_user(&self, user_id: i64) -> Result<Option<Customer>, DatabaseError> {
        Ok(self
            .tables
            .read()
            .await
            .customers
            .values()
            .find(|c| c.user_id == user_id)
            .cloned())
    }

    async fn list_employees(&self) -> Result<Vec<Employee>, DatabaseError> {
        Ok(self.tables.read().await.employees.values().cloned().collect())
    }

    async fn get_employee(&self, id: i64) -> Result<Employee, DatabaseError> {
        self.tables
            .read()
            .await
            .employees
            .get(&id)
            .cloned()
            .ok_or_else(|| DatabaseError::NotFound(format!("employee {} not found", id)))
    }

    async fn find_user(&self, user_id: i64) -> Result<Option<User>, DatabaseError> {
        Ok(self.tables.read().await.users.get(&user_id).cloned())
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
