pub mod home;
pub mod layout;
pub mod login;

pub use home::home;
pub use layout::{base_with_user, APP_TITLE};
pub use login::{login, LoginPage};
