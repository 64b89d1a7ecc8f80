pub mod customer;
pub mod employee;
pub mod ticket;
pub mod user;

pub use customer::Customer;
pub use employee::Employee;
pub use ticket::{NewTicket, ServiceTicket, StatusFilter, TicketAssignment, TicketStatus};
pub use user::User;
