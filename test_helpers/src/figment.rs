//! Shared helpers for working with `figment::Jail` in tests.
//!
//! A jail runs its closure in a fresh temporary working directory and
//! restores every environment variable it touched afterwards. Jails are
//! serialised by a global lock, so tests that read files relative to the
//! working directory or set process variables stay isolated.

use anyhow::{Result, anyhow};

/// Executes `f` inside a [`figment::Jail`], returning the closure's output.
///
/// The jail is torn down once the closure completes, even when it returns
/// an error. Failures are converted into `anyhow::Error` values so callers
/// can use `?` directly.
///
/// # Errors
///
/// Returns an error if the jail initialisation fails or the closure returns a
/// [`figment::error::Error`].
///
/// # Examples
///
/// ```
/// use test_helpers::figment::with_jail;
///
/// let listed = with_jail(|jail| {
///     jail.create_file("config.json", "{}")?;
///     Ok(std::path::Path::new("config.json").exists())
/// })?;
/// assert!(listed);
/// # Ok::<_, anyhow::Error>(())
/// ```
pub fn with_jail<F, T>(f: F) -> Result<T>
where
    F: FnOnce(&mut figment::Jail) -> figment::error::Result<T>,
{
    let mut output = None;
    figment::Jail::try_with(|j| {
        output = Some(f(j)?);
        Ok(())
    })
    .map_err(|err| anyhow!(err.to_string()))?;
    output.ok_or_else(|| anyhow!("jail closure did not return a value"))
}

/// Creates each `(name, contents)` file inside `jail`, in order.
///
/// # Errors
///
/// Returns the first [`figment::Error`] raised while writing a file.
pub fn create_files(jail: &figment::Jail, files: &[(&str, &str)]) -> figment::error::Result<()> {
    for (name, contents) in files {
        jail.create_file(name, contents)?;
    }
    Ok(())
}

/// Converts any error implementing [`ToString`] into a [`figment::Error`].
///
/// Bridges crate errors into jail closures, which must return figment
/// results.
#[expect(
    clippy::needless_pass_by_value,
    reason = "used as a `map_err` adaptor, which passes errors by value"
)]
pub fn figment_error<E: ToString>(err: E) -> figment::Error {
    figment::Error::from(err.to_string())
}
