use super::EXIT_SUCCESS;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[allow(clippy::unnecessary_wraps)]
pub fn run() -> Result<u8, String> {
    println!("{VERSION}");
    Ok(EXIT_SUCCESS)
}
