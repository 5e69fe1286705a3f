mod session;
mod signup;
mod verify;

pub use session::signin;
pub use signup::signup;
pub use verify::{resend_code, verify};
