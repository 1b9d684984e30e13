//! Command-line commands and their argument parsing.

use anyhow::{anyhow, bail, Context};
use ihome_domain::{PageQuery, UserType};
use ihome_infra::{ApiClient, NotificationReceiver, PortalApi};
use serde_json::{json, Value};

/// A parsed invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login { user_type: UserType, id: String, password: String },
    Logout,
    WhoAmI,
    Notifications,
    Dorms { page: u32, size: u32 },
    Get { path: String },
    Help,
}

impl Command {
    /// Parse arguments after the program name.
    pub fn parse(args: &[String]) -> anyhow::Result<Self> {
        let mut args = args.iter().map(String::as_str);

        let command = match args.next() {
            Some("login") => {
                let user_type = args
                    .next()
                    .ok_or_else(|| anyhow!("login requires <student|admin> <id> <password>"))?
                    .parse::<UserType>()
                    .map_err(|e| anyhow!(e))?;
                let id = args.next().ok_or_else(|| anyhow!("login requires an id"))?;
                let password = args.next().ok_or_else(|| anyhow!("login requires a password"))?;
                Self::Login { user_type, id: id.to_string(), password: password.to_string() }
            }
            Some("logout") => Self::Logout,
            Some("whoami") => Self::WhoAmI,
            Some("notifications") => Self::Notifications,
            Some("dorms") => {
                let page = parse_number(args.next(), 0, "page")?;
                let size = parse_number(args.next(), 10, "size")?;
                Self::Dorms { page, size }
            }
            Some("get") => {
                let path = args.next().ok_or_else(|| anyhow!("get requires a path"))?;
                Self::Get { path: path.to_string() }
            }
            Some("help") | None => Self::Help,
            Some(unknown) => bail!("Unknown command: {unknown}"),
        };

        if let Some(extra) = args.next() {
            bail!("Unexpected argument: {extra}");
        }
        Ok(command)
    }

    /// Run against the backend and produce the JSON printed on stdout.
    pub async fn run(self, client: &ApiClient) -> anyhow::Result<Value> {
        let portal = PortalApi::new(client.clone());

        match self {
            Self::Login { user_type, id, password } => {
                let user = client.login(user_type, &id, &password).await?;
                Ok(json!({ "loggedIn": true, "user": user }))
            }
            Self::Logout => {
                client.logout().await?;
                Ok(json!({ "loggedIn": false }))
            }
            Self::WhoAmI => {
                let snapshot = client.session().snapshot().await;
                Ok(json!({ "loggedIn": snapshot.is_authenticated(), "user": snapshot.user }))
            }
            Self::Notifications => {
                let user = client
                    .session()
                    .user()
                    .await
                    .context("Not logged in; run `ihome login` first")?;
                let receiver = NotificationReceiver::for_user(&user);
                let unread = portal.unread_count(&receiver).await?;
                let items = portal.notifications(&receiver).await?;
                Ok(json!({ "unread": unread, "items": items }))
            }
            Self::Dorms { page, size } => {
                let page = portal.list_dorms(&PageQuery::new(page, size)).await?;
                Ok(serde_json::to_value(page)?)
            }
            Self::Get { path } => Ok(client.get::<Value>(&path).await?),
            Self::Help => Ok(Value::Null),
        }
    }
}

fn parse_number(raw: Option<&str>, default: u32, name: &str) -> anyhow::Result<u32> {
    match raw {
        Some(raw) => raw.parse().with_context(|| format!("Invalid {name}: {raw}")),
        None => Ok(default),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn parses_login() {
        let command = Command::parse(&args(&["login", "admin", "a1", "secret"])).unwrap();
        assert_eq!(
            command,
            Command::Login {
                user_type: UserType::Admin,
                id: "a1".into(),
                password: "secret".into()
            }
        );
    }

    #[test]
    fn rejects_unknown_user_type() {
        assert!(Command::parse(&args(&["login", "guest", "x", "y"])).is_err());
    }

    #[test]
    fn parses_dorms_with_defaults() {
        assert_eq!(Command::parse(&args(&["dorms"])).unwrap(), Command::Dorms { page: 0, size: 10 });
        assert_eq!(
            Command::parse(&args(&["dorms", "2", "50"])).unwrap(),
            Command::Dorms { page: 2, size: 50 }
        );
        assert!(Command::parse(&args(&["dorms", "two"])).is_err());
    }

    #[test]
    fn no_arguments_is_help() {
        assert_eq!(Command::parse(&[]).unwrap(), Command::Help);
    }

    #[test]
    fn rejects_unknown_and_extra_arguments() {
        assert!(Command::parse(&args(&["fly"])).is_err());
        assert!(Command::parse(&args(&["logout", "now"])).is_err());
    }
}
