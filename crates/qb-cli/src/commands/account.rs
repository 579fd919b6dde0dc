use colored::Colorize;
use qb_client::AuthApi;
use qb_core::{Credentials, Registration};

use super::Context;

pub async fn register(
    ctx: &Context,
    name: String,
    email: String,
    password: String,
    confirm_password: String,
) -> Result<(), String> {
    let registration = Registration {
        name,
        email,
        password,
        confirm_password,
    };
    registration.validate().map_err(|e| e.to_string())?;

    let user = ctx
        .anonymous_api()?
        .register(&registration)
        .await
        .map_err(|e| format!("registration failed: {e}"))?;

    println!("  Account created for {}.", user.email.bold());
    println!("  Log in with: qb login --email {} --password ...", user.email);
    Ok(())
}

pub async fn login(ctx: &mut Context, email: String, password: String) -> Result<(), String> {
    let credentials = Credentials { email, password };
    credentials.validate().map_err(|e| e.to_string())?;

    let auth = ctx
        .anonymous_api()?
        .login(&credentials)
        .await
        .map_err(|e| format!("login failed: {e}"))?;

    ctx.store
        .set_token(auth.token)
        .map_err(|e| e.to_string())?;

    println!("  Welcome, {}!", auth.claims.email.bold());
    if !auth.claims.role.is_empty() {
        println!("  {}", format!("role: {}", auth.claims.role).dimmed());
    }
    Ok(())
}

pub fn logout(ctx: &mut Context) -> Result<(), String> {
    ctx.store.clear().map_err(|e| e.to_string())?;
    println!("  Logged out.");
    Ok(())
}
