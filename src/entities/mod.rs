pub mod prelude;

pub mod favorites;
pub mod users;
