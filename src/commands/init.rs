use crate::commands::Out;
use crate::error::IntoResult;
use crate::{Config, ErrorType, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the sales home directory and writes a default `config.json` into it.
///
/// # Errors
/// - Returns an error if a config file already exists or if any file operation fails.
pub fn init(sales_home: &Path) -> Result<Out<()>> {
    let config = Config::create(sales_home)
        .context("Unable to create the sales home directory and config")
        .pub_result(ErrorType::Config)?;
    Ok(format!("Created {}", config.config_path().display()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[test]
    fn test_init() {
        let env = TestEnv::new();
        let home = env.path("sales");
        let out = init(&home).unwrap();
        assert!(out.message().contains("config.json"));
        assert!(home.join("config.json").is_file());
        assert_eq!(init(&home).unwrap_err().error_type(), ErrorType::Config);
    }
}
