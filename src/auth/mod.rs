pub mod authenticator;
pub mod session;

pub use authenticator::Authenticator;
pub use session::{Authenticatable, BrowserSession, CurrentUser, SessionState};
