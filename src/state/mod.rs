pub mod manager;
pub mod session;

pub use manager::{OpenPolicy, SessionManager};
pub use session::{OpenOutcome, RecipeChoice, Session, SessionState};
