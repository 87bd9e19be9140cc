//! Category access control: session tokens, cookies, password checks and the gate.

pub mod cookie;
pub mod gate;
pub mod middleware;
pub mod session;
pub mod verify;

pub use middleware::{access_gate, AppState};
pub use session::{create_session_token, validate_session_token};
pub use verify::{hash_password, verify_password};
