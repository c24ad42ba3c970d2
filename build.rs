//! Retrieves information about the version of the crate from Git and the
//! build environment. It is accessible at runtime through the generated
//! `build` module.

fn main() -> shadow_rs::SdResult<()> {
    shadow_rs::new()
}
