use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::{
    auth::AuthState,
    error::{fallback, ClientError, ClientResult},
    images::ImageAsset,
    meals::{create_meal, get_meals, Meal},
    state::ClientContext,
};

#[derive(Parser)]
#[command(name = "mealmind")]
#[command(version)]
#[command(about = "Log in and manage your meals from the terminal", long_about = None)]
pub struct Cli {
    /// Backend base URL, e.g. http://localhost:3000/api
    #[arg(long, env = "MEALMIND_API_URL", global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Log in and keep the session token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "MEALMIND_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "MEALMIND_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show whether a session is stored
    Status,
    /// List your meals
    Meals,
    /// Add a meal, optionally with a JPEG/PNG photo
    AddMeal {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        image: Option<PathBuf>,
    },
}

/// Runs one command and returns the text to show on success.
pub async fn run(command: Command, ctx: &ClientContext) -> ClientResult<String> {
    match command {
        Command::Login { email, password } => {
            ctx.session.login(&email, &password).await?;
            Ok("Login realizado com sucesso".to_string())
        }
        Command::Register {
            name,
            email,
            password,
        } => {
            ctx.session.register(&name, &email, &password).await?;
            Ok("Conta criada com sucesso! Faça login para continuar.".to_string())
        }
        Command::Logout => {
            ctx.session.logout().await?;
            Ok("Sessão encerrada".to_string())
        }
        Command::Status => Ok(match ctx.session.state().await {
            AuthState::Authenticated => "Autenticado".to_string(),
            AuthState::Unauthenticated => "Não autenticado".to_string(),
        }),
        Command::Meals => get_meals(ctx).await.map(|meals| render_meals(&meals)),
        Command::AddMeal {
            title,
            description,
            image,
        } => {
            let image = match image {
                Some(path) => Some(ImageAsset::from_path(path).await?),
                None => None,
            };
            create_meal(ctx, &title, &description, image.as_ref()).await?;
            Ok("Refeição adicionada!".to_string())
        }
    }
}

pub fn render_meals(meals: &[Meal]) -> String {
    if meals.is_empty() {
        return "Nenhuma refeição".to_string();
    }
    meals
        .iter()
        .map(|m| {
            format!(
                "- {}: {}",
                m.title.as_deref().unwrap_or("Sem título"),
                m.description.as_deref().unwrap_or("Sem descrição")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Lines to print for a failed command.
pub fn render_error(err: &ClientError) -> String {
    match err {
        ClientError::Validation(fields) => fields
            .iter()
            .map(|f| format!("{}: {}", f.field, f.message))
            .collect::<Vec<_>>()
            .join("\n"),
        ClientError::NotAuthenticated => fallback::SESSION_EXPIRED.to_string(),
        ClientError::Unauthorized { message } => {
            format!("{message}\n{}", fallback::SESSION_EXPIRED)
        }
        other => format!("Erro: {}", other.user_message()),
    }
}
