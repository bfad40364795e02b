use catalog_app::{
    auth::{AuthConfig, AuthService, AuthServiceError, PasswordPolicy, PgAuthService},
    database::{self, Db},
    domain::users::data::{NewUser, Password},
};
use clap::Args;
use serde_json::json;

#[derive(Debug, Args)]
pub(crate) struct CreateUserArgs {
    #[arg(long)]
    username: String,

    #[arg(long)]
    email: String,

    /// Plaintext password; prefer the environment variable over the flag
    #[arg(long, env = "CATALOG_USER_PASSWORD", hide_env_values = true)]
    password: String,

    #[arg(long, default_value = "")]
    first_name: String,

    #[arg(long, default_value = "")]
    last_name: String,

    /// Minimum password length enforced for the new account
    #[arg(long, env = "PASSWORD_MIN_LENGTH", default_value_t = catalog_app::auth::DEFAULT_MIN_PASSWORD_LENGTH)]
    password_min_length: usize,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(args: CreateUserArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url, 1)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    // Registration never signs tokens, so the secret is irrelevant here.
    let mut config = AuthConfig::with_secret("");
    config.password_policy = PasswordPolicy {
        min_length: args.password_min_length,
    };

    let service = PgAuthService::new(Db::new(pool), &config);
    let password = Password::from(args.password);

    let user = service
        .register_user(NewUser {
            username: args.username,
            email: args.email,
            password: password.clone(),
            password_confirm: password,
            first_name: args.first_name,
            last_name: args.last_name,
        })
        .await
        .map_err(|error| match error {
            AuthServiceError::Validation(errors) => format!("invalid user: {errors}"),
            error => format!("failed to create user: {error}"),
        })?;

    println!(
        "{}",
        json!({
            "id": user.id.into_i64(),
            "username": user.username,
            "email": user.email,
        })
    );

    Ok(())
}
