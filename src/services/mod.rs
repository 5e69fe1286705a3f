pub mod item_service;
pub mod mailer;
pub mod resource_service;
pub mod user_service;
pub mod verification_code_service;

pub use item_service::{Item, ItemService};
pub use mailer::Mailer;
pub use resource_service::{Resource, ResourceService};
pub use user_service::{UserProfile, UserService};
pub use verification_code_service::{VerificationCode, VerificationCodeService};
