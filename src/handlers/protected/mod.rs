// handlers/protected/mod.rs - Handlers behind the bearer token middleware
//
// Every handler here can rely on an `AuthUser` request extension.

pub mod customers; // GET /customers[/:id]
pub mod employees; // GET /employees[/:id]
pub mod tickets;   // /service-tickets[/:id]
