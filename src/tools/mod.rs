pub mod channels;
pub mod messages;
pub mod registry;
pub mod users;
