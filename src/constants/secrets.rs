use std::io;
use std::path::Path;

const DOCKER_SECRETS_PATH: &str = "/run/secrets/";

/// Reads a docker secret mounted under [`DOCKER_SECRETS_PATH`], stripping the
/// trailing newline most secret files carry.
pub fn read_secret(name: &str) -> Result<String, io::Error> {
    let contents = std::fs::read_to_string(Path::new(DOCKER_SECRETS_PATH).join(name.to_lowercase()))?;
    Ok(contents.trim_end().to_string())
}
