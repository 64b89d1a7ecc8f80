use async_trait::async_trait;
use sqlx::PgPool;

use super::manager::{DatabaseError, DatabaseManager};
use super::models::ticket::TicketRow;
use super::models::{Customer, Employee, NewTicket, ServiceTicket, StatusFilter, TicketAssignment, User};
use super::store::RepairsStore;

const TICKET_SELECT: &str = r#"
    SELECT
        t.id, t.description, t.emergency, t.date_completed,
        c.id AS customer_id,
        c.user_id AS customer_user_id,
        c.address AS customer_address,
        cu.first_name || ' ' || cu.last_name AS customer_full_name,
        e.id AS employee_id,
        e.user_id AS employee_user_id,
        e.specialty AS employee_specialty,
        eu.first_name || ' ' || eu.last_name AS employee_full_name
    FROM service_tickets t
    JOIN customers c ON c.id = t.customer_id
    JOIN users cu ON cu.id = c.user_id
    LEFT JOIN employees e ON e.id = t.employee_id
    LEFT JOIN users eu ON eu.id = e.user_id
"#;

const CUSTOMER_SELECT: &str = r#"
    SELECT c.id, c.user_id, c.address, u.first_name || ' ' || u.last_name AS full_name
    FROM customers c
    JOIN users u ON u.id = c.user_id
"#;

const EMPLOYEE_SELECT: &str = r#"
    SELECT e.id, e.user_id, e.specialty, u.first_name || ' ' || u.last_name AS full_name
    FROM employees e
    JOIN users u ON u.id = e.user_id
"#;

/// Postgres-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RepairsStore for PgStore {
    async fn list_tickets(&self, filter: StatusFilter) -> Result<Vec<ServiceTicket>, DatabaseError> {
        let sql = format!("{} WHERE {} ORDER BY t.id", TICKET_SELECT, filter.sql_predicate());
        let rows = sqlx::query_as::<_, TicketRow>(&sql).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(ServiceTicket::from).collect())
    }

    async fn get_ticket(&self, id: i64) -> Result<ServiceTicket, DatabaseError> {
        let sql = format!("{} WHERE t.id = $1", TICKET_SELECT);
        sqlx::query_as::<_, TicketRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(ServiceTicket::from)
            .ok_or_else(|| DatabaseError::NotFound(format!("service ticket {} not found", id)))
    }

    async fn create_ticket(&self, ticket: NewTicket) -> Result<ServiceTicket, DatabaseError> {
        let (id,): (i64,) = sqlx::query_as(
            "INSERT INTO service_tickets (customer_id, description, emergency) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(ticket.customer_id)
        .bind(&ticket.description)
        .bind(ticket.emergency)
        .fetch_one(&self.pool)
        .await?;

        self.get_ticket(id).await
    }

    async fn assign_ticket(&self, id: i64, assignment: TicketAssignment) -> Result<(), DatabaseError> {
        let result = sqlx::query("UPDATE service_tickets SET employee_id = $1, date_completed = $2 WHERE id = $3")
            .bind(assignment.employee_id)
            .bind(assignment.date_completed)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("service ticket {} not found", id)));
        }
        Ok(())
    }

    async fn delete_ticket(&self, id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM service_tickets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("service ticket {} not found", id)));
        }
        Ok(())
    }

    async fn list_customers(&self) -> Result<Vec<Customer>, DatabaseError> {
        let sql = format!("{} ORDER BY c.id", CUSTOMER_SELECT);
        Ok(sqlx::query_as::<_, Customer>(&sql).fetch_all(&self.pool).await?)
    }

    async fn get_customer(&self, id: i64) -> Result<Customer, DatabaseError> {
        let sql = format!("{} WHERE c.id = $1", CUSTOMER_SELECT);
        sqlx::query_as::<_, Customer>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("customer {} not found", id)))
    }

    async fn customer_for_user(&self, user_id: i64) -> Result<Option<Customer>, DatabaseError> {
        let sql = format!("{} WHERE c.user_id = $1", CUSTOMER_SELECT);
        Ok(sqlx::query_as::<_, Customer>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_employees(&self) -> Result<Vec<Employee>, DatabaseError> {
        let sql = format!("{} ORDER BY e.id", EMPLOYEE_SELECT);
        Ok(sqlx::query_as::<_, Employee>(&sql).fetch_all(&self.pool).await?)
    }

    async fn get_employee(&self, id: i64) -> Result<Employee, DatabaseError> {
        let sql = format!("{} WHERE e.id = $1", EMPLOYEE_SELECT);
        sqlx::query_as::<_, Employee>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("employee {} not found", id)))
    }

    async fn find_user(&self, user_id: i64) -> Result<Option<User>, DatabaseError> {
        Ok(sqlx::query_as::<_, User>(
            "SELECT id, username, first_name, last_name, is_staff, is_active FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}
