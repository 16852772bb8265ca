//! User management (owner only).

use super::output::{emit, render_table};
use super::{Context, action_error, prompt};
use karat_client::Access;
use karat_core::model::display_date;
use karat_core::{NewUser, Role, User};

pub async fn list(ctx: &Context) -> anyhow::Result<()> {
    ctx.require(Access::Owner)?;
    let users = ctx
        .client
        .list_users()
        .await
        .map_err(|e| action_error(e, "Failed to load users"))?;
    emit(ctx.output, &users, || users_table(&users))
}

fn users_table(users: &[User]) -> String {
    if users.is_empty() {
        return "No users found.\n".to_string();
    }
    let rows: Vec<Vec<String>> = users
        .iter()
        .map(|u| {
            vec![
                u.id.to_string(),
                u.username.clone(),
                u.full_name.clone(),
                u.role.label().to_string(),
                if u.is_active { "active" } else { "inactive" }.to_string(),
                display_date(&u.created_at),
            ]
        })
        .collect();
    render_table(&["ID", "Username", "Name", "Role", "Status", "Created"], &rows)
}

/// Only roles the register endpoint accepts.
pub fn parse_role(raw: &str) -> anyhow::Result<Role> {
    let role: Role = raw.trim().parse()?;
    if !Role::ASSIGNABLE.contains(&role) {
        let known: Vec<String> = Role::ASSIGNABLE.iter().map(Role::to_string).collect();
        anyhow::bail!("unknown role '{raw}' (expected one of: {})", known.join(", "));
    }
    Ok(role)
}

pub async fn create(
    ctx: &Context,
    username: String,
    email: String,
    full_name: String,
    password: Option<String>,
    role: &str,
) -> anyhow::Result<()> {
    ctx.require(Access::Owner)?;
    let role = parse_role(role)?;
    let password = match password {
        Some(password) => password,
        None => prompt("Password for new user")?,
    };
    if password.is_empty() {
        anyhow::bail!("password must not be empty");
    }

    let user = NewUser {
        username,
        email,
        full_name,
        password,
        role,
    };
    ctx.client
        .register(&user)
        .await
        .map_err(|e| action_error(e, "Failed to create user"))?;
    println!("✔ Created user {} ({})", user.username, user.role.as_str());
    Ok(())
}

pub async fn delete(ctx: &Context, id: i64) -> anyhow::Result<()> {
    ctx.require(Access::Owner)?;
    ctx.client
        .delete_user(id)
        .await
        .map_err(|e| action_error(e, "Failed to delete user"))?;
    println!("✔ Deleted user #{id}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_role() {
        assert_eq!(parse_role("setter").unwrap(), Role::Setter);
        assert_eq!(parse_role(" owner ").unwrap(), Role::Owner);
        let err = parse_role("goldsmith").unwrap_err();
        assert!(err.to_string().contains("expected one of"));
    }

    #[test]
    fn test_users_table() {
        let users = vec![User {
            id: 2,
            username: "filer1".to_string(),
            email: "filer1@example.com".to_string(),
            full_name: "Fay Filer".to_string(),
            role: Role::Filer,
            is_active: false,
            created_at: "2024-02-10T08:00:00".to_string(),
        }];
        let table = users_table(&users);
        assert!(table.contains("Fay Filer"));
        assert!(table.contains("inactive"));
        assert!(table.contains("2024-02-10"));
        assert_eq!(users_table(&[]), "No users found.\n");
    }
}
