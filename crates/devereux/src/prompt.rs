//! Passphrase and password acquisition
//!
//! Priority for the repository key:
//! 1. `--key` on the command line
//! 2. `DEVEREUX_KEY` environment variable
//! 3. Hidden terminal prompt

use crate::error::{Result, StoreError};

/// Environment variable holding the repository key
pub const KEY_ENV_VAR: &str = "DEVEREUX_KEY";

/// Pick the repository key from the flag, the environment, or a prompt
pub fn resolve_key(flag: Option<String>) -> Result<String> {
    let env = std::env::var(KEY_ENV_VAR).ok();
    resolve_key_from(flag, env, || read_hidden("Enter repository key> "))
}

fn resolve_key_from(
    flag: Option<String>,
    env: Option<String>,
    prompt: impl FnOnce() -> Result<String>,
) -> Result<String> {
    let key = match (flag, env) {
        (Some(key), _) => key,
        (None, Some(key)) if !key.is_empty() => key,
        _ => prompt()?,
    };

    if key.is_empty() {
        return Err(StoreError::EmptyPassphrase);
    }

    Ok(key)
}

/// Read a value without echoing it
pub fn read_hidden(prompt: &str) -> Result<String> {
    rpassword::prompt_password(prompt).map_err(StoreError::Prompt)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_prompt() -> Result<String> {
        panic!("prompt should not be reached");
    }

    #[test]
    fn test_flag_wins() {
        let key = resolve_key_from(Some("flag".into()), Some("env".into()), no_prompt).unwrap();
        assert_eq!(key, "flag");
    }

    #[test]
    fn test_env_fallback() {
        let key = resolve_key_from(None, Some("env".into()), no_prompt).unwrap();
        assert_eq!(key, "env");
    }

    #[test]
    fn test_prompt_fallback() {
        let key = resolve_key_from(None, Some(String::new()), || Ok("typed".into())).unwrap();
        assert_eq!(key, "typed");
    }

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(
            resolve_key_from(Some(String::new()), None, no_prompt),
            Err(StoreError::EmptyPassphrase)
        ));
        assert!(matches!(
            resolve_key_from(None, None, || Ok(String::new())),
            Err(StoreError::EmptyPassphrase)
        ));
    }
}
