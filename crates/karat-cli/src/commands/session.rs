//! Session commands.
//!
//! `karat login`, `karat logout`, `karat whoami`.

use super::output::emit;
use super::{Context, prompt};
use karat_core::User;

pub async fn login(ctx: &Context, username: &str, password: Option<String>) -> anyhow::Result<()> {
    let password = match password {
        Some(password) => password,
        None => prompt("Password")?,
    };

    let user = ctx
        .client
        .login(username, &password)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message("Login failed")))?;

    emit(ctx.output, &user, || {
        format!(
            "✔ Logged in as {} ({})\n",
            user.full_name,
            user.role.as_str()
        )
    })
}

pub fn logout(ctx: &Context) -> anyhow::Result<()> {
    // Nothing to clear is not an error.
    ctx.session().logout()?;
    println!("✔ Logged out");
    Ok(())
}

pub fn whoami(ctx: &Context) -> anyhow::Result<()> {
    if !ctx.session().is_authenticated() {
        anyhow::bail!("not logged in; run `karat login`");
    }
    let Some(user) = ctx.session().current_user() else {
        anyhow::bail!("session has no profile; run `karat login` again");
    };
    emit(ctx.output, &user, || describe(&user))
}

fn describe(user: &User) -> String {
    format!(
        "{} ({})\n  username: {}\n  email:    {}\n  active:   {}\n",
        user.full_name,
        user.role.as_str(),
        user.username,
        if user.email.is_empty() { "-" } else { &user.email },
        if user.is_active { "yes" } else { "no" },
    )
}
