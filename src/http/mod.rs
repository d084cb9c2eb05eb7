mod users;
pub use users::Client;
