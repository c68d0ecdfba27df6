//! Html feature migrations: introduces `HtmlBodyPart` and retires `BodyPart`.

mod m001_create;
mod m002_placeholder;
mod m003_body_part;

pub use m001_create::M001Create;
pub use m002_placeholder::M002Placeholder;
pub use m003_body_part::{upgrade_body, M003BodyPart};

use crate::migrations::traits::Register;

/// Feature name the html migration versions are recorded under.
pub const FEATURE: &str = "html";

/// Part definition introduced by this feature.
pub const HTML_BODY_PART: &str = "HtmlBodyPart";

/// Legacy part definition replaced by [`HTML_BODY_PART`].
pub const BODY_PART: &str = "BodyPart";

/// Create the html migrations register.
pub fn create_register() -> Register {
    Register::new(FEATURE)
        .register(M001Create)
        .register(M002Placeholder)
        .register(M003BodyPart)
}
