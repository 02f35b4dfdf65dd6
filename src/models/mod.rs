pub mod event;
pub mod feedback;
pub mod rsvp;
pub mod user;

pub use event::{Event, EventStatus};
pub use feedback::Feedback;
pub use rsvp::Rsvp;
pub use user::User;
