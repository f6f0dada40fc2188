//! Create the principal account in PostgreSQL if none exists yet.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::io::{self, Write};
use std::sync::Arc;

use campus_backend::domain::ports::{
    BootstrapOutcome, PrincipalBootstrap, PrincipalBootstrapRequest,
};
use campus_backend::domain::{Email, IdentityService};
use campus_backend::outbound::credentials::BcryptCredentialHasher;
use campus_backend::outbound::persistence::{
    DbPool, DieselIdentityRepository, PoolConfig, migrate,
};
use clap::Parser;
use mockable::DefaultClock;
use tokio::runtime::Builder;
use zeroize::Zeroizing;

/// `create-principal` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "create-principal",
    about = "Provision the principal account used to administer staff",
    version
)]
struct CliArgs {
    /// Display name stored on the account.
    #[arg(long, default_value = "Principal")]
    name: String,
    /// Login email; stored lowercased.
    #[arg(long, value_name = "email")]
    email: String,
    /// Initial password. Falls back to `PRINCIPAL_PASSWORD` when omitted.
    #[arg(long, value_name = "password")]
    password: Option<String>,
    /// Database connection URL. Falls back to `DATABASE_URL` when omitted.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

fn main() -> io::Result<()> {
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let email = Email::new(&args.email)
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidInput, error.to_string()))?;
    let password = resolve_from_env(args.password, "--password", "PRINCIPAL_PASSWORD")?;
    let database_url = resolve_from_env(args.database_url, "--database-url", "DATABASE_URL")?;

    migrate(database_url.clone())
        .await
        .map_err(|error| io::Error::other(format!("run migrations: {error}")))?;
    let pool = DbPool::new(PoolConfig::new(&database_url))
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;

    let service = IdentityService::new(
        Arc::new(DieselIdentityRepository::new(pool)),
        Arc::new(BcryptCredentialHasher::new()),
        Arc::new(DefaultClock),
    );
    let outcome = service
        .ensure_principal(PrincipalBootstrapRequest {
            name: args.name,
            email,
            password: Zeroizing::new(password),
        })
        .await
        .map_err(|error| io::Error::other(format!("create principal: {error}")))?;

    let mut stdout = io::stdout().lock();
    match outcome {
        BootstrapOutcome::Created(id) => writeln!(stdout, "created={id}"),
        BootstrapOutcome::AlreadyExists(id) => writeln!(stdout, "existing={id}"),
    }
}

fn resolve_from_env(explicit: Option<String>, flag: &str, var: &str) -> io::Result<String> {
    if let Some(value) = explicit {
        if value.trim().is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{flag} must not be empty when provided"),
            ));
        }
        return Ok(value);
    }

    let from_env = env::var(var).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("value missing: set {flag} or {var}"),
        )
    })?;
    if from_env.trim().is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{var} must not be empty"),
        ));
    }
    Ok(from_env)
}

#[cfg(test)]
mod tests {
    //! Unit tests for argument fallbacks.

    use clap::Parser;
    use env_lock::lock_env;
    use rstest::rstest;

    use super::{CliArgs, resolve_from_env};

    const VAR: &str = "CAMPUS_TEST_PRINCIPAL_FALLBACK";

    #[rstest]
    fn explicit_value_wins_over_environment() {
        let _guard = lock_env([(VAR, Some("from-env"))]);
        let value = resolve_from_env(Some("explicit".to_owned()), "--flag", VAR)
            .expect("explicit value");
        assert_eq!(value, "explicit");
    }

    #[rstest]
    fn environment_is_used_when_flag_is_absent() {
        let _guard = lock_env([(VAR, Some("from-env"))]);
        let value = resolve_from_env(None, "--flag", VAR).expect("environment value");
        assert_eq!(value, "from-env");
    }

    #[rstest]
    #[case(Some("  "), None)]
    #[case(None, None)]
    #[case(None, Some(""))]
    fn blank_or_missing_values_are_rejected(
        #[case] explicit: Option<&str>,
        #[case] env_value: Option<&str>,
    ) {
        let _guard = lock_env([(VAR, env_value)]);
        let error = resolve_from_env(explicit.map(str::to_owned), "--flag", VAR)
            .expect_err("blank value should fail");
        assert_eq!(error.kind(), std::io::ErrorKind::InvalidInput);
    }

    #[rstest]
    fn name_defaults_to_principal() {
        let args = CliArgs::try_parse_from(["create-principal", "--email", "head@school.edu"])
            .expect("arguments parse");
        assert_eq!(args.name, "Principal");
        assert!(args.password.is_none());
    }
}
