pub mod hash;
pub mod inspect;
pub mod verify;

use std::io::BufRead;

use secrecy::SecretString;

/// Take the password from the command line / environment, or else from the
/// first line of stdin.
pub fn read_password(arg: Option<&str>) -> anyhow::Result<SecretString> {
    if let Some(password) = arg {
        return Ok(SecretString::new(password.to_owned()));
    }
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']).to_owned();
    Ok(SecretString::new(password))
}
