use clap::{Parser, Subcommand};
use reqwest::{Method, RequestBuilder};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "todo-cli")]
#[command(about = "Command-line client for the to-do service", long_about = None)]
struct Cli {
    #[arg(long, default_value = "http://localhost:3333")]
    url: String,

    /// Value sent in the `username` header for task commands.
    #[arg(short, long)]
    username: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check service status
    Health,
    /// Register a new user
    CreateUser { name: String, username: String },
    /// Show a user by id
    GetUser { id: String },
    /// Move a user onto the pro plan
    Upgrade { id: String },
    /// List the caller's tasks
    List,
    /// Create a task (deadline: YYYY-MM-DD or RFC 3339)
    Add { title: String, deadline: String },
    /// Change a task's title and deadline
    Update {
        id: String,
        title: String,
        deadline: String,
    },
    /// Mark a task as done
    Done { id: String },
    /// Delete a task
    Delete { id: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let request = |method: Method, path: String| -> RequestBuilder {
        let builder = client.request(method, format!("{}{}", base, path));
        match &cli.username {
            Some(username) => builder.header("username", username),
            None => builder,
        }
    };

    let builder = match &cli.command {
        Commands::Health => request(Method::GET, "/health".into()),
        Commands::CreateUser { name, username } => request(Method::POST, "/users".into())
            .json(&json!({ "name": name, "username": username })),
        Commands::GetUser { id } => request(Method::GET, format!("/users/{}", id)),
        Commands::Upgrade { id } => request(Method::PATCH, format!("/users/{}/pro", id)),
        Commands::List => request(Method::GET, "/todos".into()),
        Commands::Add { title, deadline } => request(Method::POST, "/todos".into())
            .json(&json!({ "title": title, "deadline": deadline })),
        Commands::Update {
            id,
            title,
            deadline,
        } => request(Method::PUT, format!("/todos/{}", id))
            .json(&json!({ "title": title, "deadline": deadline })),
        Commands::Done { id } => request(Method::PATCH, format!("/todos/{}/done", id)),
        Commands::Delete { id } => request(Method::DELETE, format!("/todos/{}", id)),
    };

    print_response(builder.send().await?).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: service returned status {}", status);
        if !text.is_empty() {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    if text.is_empty() {
        println!("{}", status);
        return Ok(());
    }

    let json: Value = serde_json::from_str(&text)?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
