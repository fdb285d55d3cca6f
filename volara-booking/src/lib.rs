pub mod manager;
pub mod models;

pub use manager::{BookingError, BookingManager, CreateBookingRequest, PassengerInput};
pub use models::{Gender, Passenger, Ticket, TicketRepository, TicketStatus};
