#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use repairs_api::{
    app,
    auth::{generate_jwt, Claims},
    config::AppConfig,
    database::{
        models::{Customer, Employee, NewTicket, ServiceTicket, TicketAssignment, User},
        MemoryStore, RepairsStore,
    },
    state::AppState,
};

pub const DONE_DATE: &str = "2024-01-10";

/// Router over a seeded in-memory store:
/// one staff member who is also an employee, a second employee, two
/// customers, and one ticket in each derived status.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub secret: String,
    pub staff: User,
    pub customer_user: User,
    pub customer: Customer,
    pub other_customer: Customer,
    pub employee: Employee,
    pub other_employee: Employee,
    pub unclaimed: ServiceTicket,
    pub in_progress: ServiceTicket,
    pub done: ServiceTicket,
}

impl TestApp {
    pub async fn new() -> Result<Self> {
        Self::with_config(AppConfig::development()).await
    }

    pub async fn with_config(mut config: AppConfig) -> Result<Self> {
        config.api.enable_request_logging = false;
        let secret = config.security.jwt_secret.clone();

        let store = Arc::new(MemoryStore::new());
        let staff = store.add_user("meg@ducks.com", "Meg", "Ducks", true).await;
        let other_staff = store.add_user("pat@ducks.com", "Patrick", "Ducks", true).await;
        let customer_user = store.add_user("bryan@nss.com", "Bryan", "Nilsen", false).await;
        let other_customer_user = store.add_user("jenna@nss.com", "Jenna", "Solis", false).await;

        let employee = store.add_employee(&staff, "Laptops").await;
        let other_employee = store.add_employee(&other_staff, "Appliances").await;
        let customer = store.add_customer(&customer_user, "100 Main St").await;
        let other_customer = store.add_customer(&other_customer_user, "404 Unknown Ave").await;

        let unclaimed = store.create_ticket(new_ticket(&customer, "Laptop will not power on", true)).await?;
        let in_progress = store.create_ticket(new_ticket(&other_customer, "Cracked phone screen", false)).await?;
        let done = store.create_ticket(new_ticket(&customer, "Fridge is warm", true)).await?;

        store
            .assign_ticket(in_progress.id, TicketAssignment { employee_id: employee.id, date_completed: None })
            .await?;
        store
            .assign_ticket(
                done.id,
                TicketAssignment { employee_id: other_employee.id, date_completed: Some(DONE_DATE.parse::<NaiveDate>()?) },
            )
            .await?;
        let in_progress = store.get_ticket(in_progress.id).await?;
        let done = store.get_ticket(done.id).await?;

        let router = app(AppState::new(store.clone(), config));

        Ok(Self {
            router,
            store,
            secret,
            staff,
            customer_user,
            customer,
            other_customer,
            employee,
            other_employee,
            unclaimed,
            in_progress,
            done,
        })
    }

    pub fn token_for(&self, user: &User) -> String {
        let claims = Claims::new(user.id, &user.username, 1).expect("claims");
        generate_jwt(&claims, &self.secret).expect("token")
    }

    pub fn staff_token(&self) -> String {
        self.token_for(&self.staff)
    }

    pub fn customer_token(&self) -> String {
        self.token_for(&self.customer_user)
    }

    /// Send one request through the router and decode the JSON body (Null when empty)
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&json)?))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
        };
        Ok((status, value))
    }

    pub async fn get(&self, uri: &str, token: &str) -> Result<(StatusCode, Value)> {
        self.send(Method::GET, uri, Some(token), None).await
    }
}

fn new_ticket(customer: &Customer, description: &str, emergency: bool) -> NewTicket {
    NewTicket {
        customer_id: customer.id,
        description: description.to_string(),
        emergency,
    }
}

/// Ticket ids from a JSON array response
pub fn ids(body: &Value) -> Vec<i64> {
    body.as_array()
        .map(|items| items.iter().filter_map(|t| t["id"].as_i64()).collect())
        .unwrap_or_default()
}
