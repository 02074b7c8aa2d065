pub mod api;
pub mod drafts;
pub mod error;
pub mod filter;
pub mod session;
pub mod slots;

pub use api::{AdminApi, ApiResult, HttpAdminApi};
pub use drafts::{derive_draft, parse_hours, DraftRecord, DraftStore};
pub use error::ClientError;
pub use filter::{search_projects, search_users, StatusCounts, StatusFilter};
pub use session::{ActionOutcome, Collection, DashboardTab, GlobalAction, ReviewSession};
pub use slots::{ActionSlots, SlotMessage, SlotStatus};
