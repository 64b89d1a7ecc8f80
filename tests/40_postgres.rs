//! PgStore against a live database. Runs only when DATABASE_URL is set.

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use tokio::sync::OnceCell;

use repairs_api::{
    config::AppConfig,
    database::{
        models::{NewTicket, StatusFilter, TicketAssignment},
        DatabaseError, DatabaseManager, PgStore, RepairsStore,
    },
};

static SCHEMA: OnceCell<()> = OnceCell::const_new();

async fn connect() -> Result<Option<PgPool>> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping Postgres store test");
        return Ok(None);
    };

    let mut config = AppConfig::development().database;
    config.url = Some(url);
    let pool = DatabaseManager::connect(&config).await?;

    // Both steps are idempotent; applying them twice proves it
    SCHEMA
        .get_or_try_init(|| async {
            for _ in 0..2 {
                DatabaseManager::migrate(&pool).await?;
                DatabaseManager::seed(&pool).await?;
            }
            Ok::<_, DatabaseError>(())
        })
        .await?;

    Ok(Some(pool))
}

/// Users, a customer and an employee unique to one test run
struct Fixture {
    user_ids: Vec<i64>,
    customer_id: i64,
    employee_id: i64,
    employee_user_id: i64,
}

impl Fixture {
    async fn create(pool: &PgPool, tag: &str) -> Result<Self> {
        let stamp = Utc::now().timestamp_micros();
        let customer_user = add_user(pool, &format!("{tag}-customer-{stamp}"), "Ada", "Lovelace").await?;
        let employee_user = add_user(pool, &format!("{tag}-employee-{stamp}"), "Grace", "Hopper").await?;

        let customer_id = sqlx::query_scalar("INSERT INTO customers (user_id, address) VALUES ($1, $2) RETURNING id")
            .bind(customer_user)
            .bind("12 Elm St")
            .fetch_one(pool)
            .await?;
        let employee_id = sqlx::query_scalar("INSERT INTO employees (user_id, specialty) VALUES ($1, $2) RETURNING id")
            .bind(employee_user)
            .bind("Compilers")
            .fetch_one(pool)
            .await?;

        Ok(Self {
            user_ids: vec![customer_user, employee_user],
            customer_id,
            employee_id,
            employee_user_id: employee_user,
        })
    }

    async fn ticket(&self, store: &PgStore, description: &str) -> Result<i64> {
        let ticket = store
            .create_ticket(NewTicket {
                customer_id: self.customer_id,
                description: description.to_string(),
                emergency: false,
            })
            .await?;
        Ok(ticket.id)
    }

    // Customers, employees and tickets cascade from users
    async fn remove(self, pool: &PgPool) -> Result<()> {
        sqlx::query("DELETE FROM users WHERE id = ANY($1)")
            .bind(&self.user_ids)
            .execute(pool)
            .await?;
        Ok(())
    }
}

async fn add_user(pool: &PgPool, username: &str, first: &str, last: &str) -> Result<i64> {
    Ok(sqlx::query_scalar(
        "INSERT INTO users (username, first_name, last_name, is_staff) VALUES ($1, $2, $3, FALSE) RETURNING id",
    )
    .bind(username)
    .bind(first)
    .bind(last)
    .fetch_one(pool)
    .await?)
}

fn completed() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(2024, 1, 15)
}

#[tokio::test]
async fn seed_fixture_is_readable() -> Result<()> {
    let Some(pool) = connect().await? else { return Ok(()) };
    let store = PgStore::new(pool.clone());

    store.health_check().await?;

    let customer = store.get_customer(1).await?;
    assert_eq!(customer.full_name, "Bryan Nilsen");
    assert_eq!(customer.address, "100 Main St");

    let employee = store.get_employee(3).await?;
    assert_eq!(employee.full_name, "Patrick Ducks");
    assert_eq!(employee.specialty, "Appliances");

    let staff = store.find_user(1).await?.expect("seeded staff user");
    assert!(staff.is_staff);
    assert!(staff.is_active);

    pool.close().await;
    Ok(())
}

#[tokio::test]
async fn status_filters_partition_tickets() -> Result<()> {
    let Some(pool) = connect().await? else { return Ok(()) };
    let store = PgStore::new(pool.clone());
    let fixture = Fixture::create(&pool, "filters").await?;

    let unclaimed = fixture.ticket(&store, "Kernel panic on boot").await?;
    let in_progress = fixture.ticket(&store, "Fan is loud").await?;
    let done = fixture.ticket(&store, "Dead pixel").await?;

    store
        .assign_ticket(in_progress, TicketAssignment { employee_id: fixture.employee_id, date_completed: None })
        .await?;
    store
        .assign_ticket(done, TicketAssignment { employee_id: fixture.employee_id, date_completed: completed() })
        .await?;

    let ours = [unclaimed, in_progress, done];
    for (filter, expected) in [
        (StatusFilter::All, vec![unclaimed, in_progress, done]),
        (StatusFilter::Done, vec![done]),
        (StatusFilter::Unclaimed, vec![unclaimed]),
        (StatusFilter::InProgress, vec![in_progress]),
    ] {
        let tickets = store.list_tickets(filter).await?;

        // Every row the SQL predicate returns satisfies the in-memory filter
        assert!(tickets.iter().all(|t| filter.matches(t.status())), "{filter:?}");

        let ids: Vec<i64> = tickets.iter().map(|t| t.id).filter(|id| ours.contains(id)).collect();
        assert_eq!(ids, expected, "{filter:?}");
    }

    let ticket = store.get_ticket(done).await?;
    assert_eq!(ticket.date_completed, completed());
    assert_eq!(ticket.customer.full_name, "Ada Lovelace");
    let employee = ticket.employee.expect("assigned employee");
    assert_eq!(employee.id, fixture.employee_id);
    assert_eq!(employee.full_name, "Grace Hopper");
    assert_eq!(employee.specialty, "Compilers");

    // Unassigned ticket comes back through the LEFT JOIN with no employee
    let ticket = store.get_ticket(unclaimed).await?;
    assert!(ticket.employee.is_none());
    assert!(ticket.date_completed.is_none());

    fixture.remove(&pool).await?;
    pool.close().await;
    Ok(())
}

#[tokio::test]
async fn missing_rows_are_not_found() -> Result<()> {
    let Some(pool) = connect().await? else { return Ok(()) };
    let store = PgStore::new(pool.clone());
    let fixture = Fixture::create(&pool, "missing").await?;
    let missing = i64::MAX;

    assert!(matches!(
        store.get_ticket(missing).await,
        Err(DatabaseError::NotFound(m)) if m == format!("service ticket {missing} not found")
    ));
    assert!(matches!(store.get_customer(missing).await, Err(DatabaseError::NotFound(_))));
    assert!(matches!(store.get_employee(missing).await, Err(DatabaseError::NotFound(_))));
    assert!(matches!(
        store
            .assign_ticket(missing, TicketAssignment { employee_id: fixture.employee_id, date_completed: None })
            .await,
        Err(DatabaseError::NotFound(_))
    ));
    assert!(store.find_user(missing).await?.is_none());
    assert!(store.customer_for_user(fixture.employee_user_id).await?.is_none());

    let ticket = fixture.ticket(&store, "Sticky keys").await?;
    store.delete_ticket(ticket).await?;
    assert!(matches!(store.delete_ticket(ticket).await, Err(DatabaseError::NotFound(_))));
    assert!(matches!(store.get_ticket(ticket).await, Err(DatabaseError::NotFound(_))));

    fixture.remove(&pool).await?;
    pool.close().await;
    Ok(())
}
