use std::net::SocketAddr;
use std::process;

use clap::{Parser, Subcommand};
use comfy_table::{modifiers, presets, ContentArrangement, Table};
use terminal_size::{terminal_size, Width};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use iconsole::api::InfraApi;
use iconsole::app::build_app;
use iconsole::config::{self, DEFAULT_HOST, DEFAULT_PORT};
use iconsole::models::AppState;

fn build_state_from_env(env_file: Option<&str>) -> AppState {
    config::load_env_file(env_file);

    let client = reqwest::Client::builder()
        .user_agent(format!("IConsole/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_default();
    let api = InfraApi::new(client, config::get_backend_url());

    AppState::new(api, config::get_login_username(), config::get_login_password())
}

async fn start_server(mut state: AppState, host: &str, port: u16, stylesheet: Option<String>) {
    if let Some(path) = stylesheet {
        match std::fs::read_to_string(&path) {
            Ok(css) => {
                state.custom_css = Some(css);
                tracing::info!("Loaded custom stylesheet from {}", path);
            }
            Err(e) => {
                tracing::error!(%e, "Failed to read custom stylesheet");
                eprintln!(
                    "{} {}: {}",
                    yansi::Paint::red("Failed to read custom stylesheet at"),
                    path,
                    e
                );
                process::exit(1);
            }
        }
    }

    let addr: SocketAddr = match format!("{}:{}", host, port).parse() {
        Ok(a) => a,
        Err(e) => {
            tracing::error!(%e, "Invalid host/port format");
            eprintln!("{}: {}", yansi::Paint::red("Invalid host/port format"), e);
            process::exit(1);
        }
    };
    let app = build_app(state);
    tracing::info!(%addr, "Starting IConsole server");
    println!(
        "{} {}",
        yansi::Paint::new("Web console running on").green(),
        yansi::Paint::new(format!("http://{}", addr)).cyan()
    );
    match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(%e, "Server encountered an error while running");
                eprintln!("{}: {}", yansi::Paint::new("Server error").red(), e);
                process::exit(1);
            }
        }
        Err(e) => {
            tracing::error!(%e, "Failed to bind to address; is the port already in use?");
            eprintln!(
                "{}: {}\n{}",
                yansi::Paint::new(format!("Failed to bind to {}", addr)).red(),
                e,
                yansi::Paint::new(
                    "Please stop any process using this port, or start the server with a different --port value."
                )
                .yellow()
            );
            process::exit(1);
        }
    }
}

fn json_value_to_string(v: &serde_json::Value) -> String {
    match v {
        serde_json::Value::Null => "".to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
            serde_json::to_string(v).unwrap_or_default()
        }
    }
}

fn base_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    if let Some((Width(w), _)) = terminal_size() {
        table.set_width(w.saturating_sub(4));
    }
    table
}

fn print_table(value: &serde_json::Value) {
    let mut table = base_table();

    match value {
        serde_json::Value::Array(arr) => {
            if arr.is_empty() {
                println!("(empty list)");
                return;
            }
            if let Some(first) = arr.iter().find_map(|v| v.as_object()) {
                let headers: Vec<&String> = first.keys().collect();
                table.set_header(&headers);
                for item in arr {
                    if let Some(obj) = item.as_object() {
                        let row: Vec<String> = headers
                            .iter()
                            .map(|k| obj.get(*k).map(json_value_to_string).unwrap_or_default())
                            .collect();
                        table.add_row(row);
                    }
                }
            } else {
                table.set_header(vec!["Value"]);
                for item in arr {
                    table.add_row(vec![json_value_to_string(item)]);
                }
            }
        }
        serde_json::Value::Object(obj) => {
            table.set_header(vec!["Field", "Value"]);
            for (k, v) in obj {
                table.add_row(vec![k, &json_value_to_string(v)]);
            }
        }
        _ => {
            println!("{}", json_value_to_string(value));
            return;
        }
    }

    println!("\n{table}\n");
}

fn print_typed<T: serde::Serialize>(value: &T) {
    match serde_json::to_value(value) {
        Ok(v) => print_table(&v),
        Err(e) => eprintln!("{}: {}", yansi::Paint::red("Failed to render response"), e),
    }
}

fn fail(context: &str, e: impl std::fmt::Display) -> ! {
    eprintln!("{}: {}", yansi::Paint::new(context).red(), e);
    process::exit(1);
}

#[derive(Parser)]
#[command(
    name = "iconsole",
    author,
    version,
    about = "IConsole admin console",
    long_about = r#"IConsole — a web console for an OpenStack-compatible IaaS backend.

Run `iconsole serve` (or just `iconsole`) to start the web console, or use the
subcommands to perform the same backend operations from the terminal. Backend
location and login credentials come from environment variables or an env file
(see `--env-file`).

Examples:
  1) Start the console:
      iconsole serve --host 127.0.0.1 --port 8080
  2) Inspect the platform:
      iconsole overview
  3) Manage servers:
      iconsole servers list
      iconsole servers stop 4f1c...
"#,
    after_help = "Use `iconsole <subcommand> --help` for subcommand specific options."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// Disable colorized output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web console
    Serve {
        /// Host to bind to
        #[arg(long, default_value_t = String::from(DEFAULT_HOST))]
        host: String,
        /// Port to bind to
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,
        /// Path to .env file
        #[arg(long)]
        env_file: Option<String>,
        /// Path to a custom stylesheet to serve instead of the default
        #[arg(long)]
        stylesheet: Option<String>,
    },
    /// Validate configuration and backend connectivity
    #[command(
        about = "Validate configuration and ensure backend connectivity.",
        long_about = "Check that the backend URL is configured and that the auth, users and projects services answer their ping endpoints."
    )]
    CheckConfig { env_file: Option<String> },
    /// Print the dashboard overview snapshot
    Overview,
    /// Manage servers via the backend
    Servers {
        #[command(subcommand)]
        sub: ServerCommands,
    },
    /// Manage images via the backend
    Images {
        #[command(subcommand)]
        sub: ImageCommands,
    },
}

#[derive(Subcommand)]
enum ServerCommands {
    /// List servers
    List,
    /// Show full details for one server
    Show { server_id: String },
    /// Start a stopped server
    Start { server_id: String },
    /// Stop a running server
    Stop { server_id: String },
    /// Reboot a server
    Reboot { server_id: String },
    /// Delete a server
    Delete { server_id: String },
}

#[derive(Subcommand)]
enum ImageCommands {
    /// List images
    List,
    /// Import an image from a remote URL
    ImportUrl {
        image_url: String,
        image_name: String,
        /// Image visibility (public or private)
        #[arg(long, default_value = "private")]
        visibility: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.no_color {
        yansi::whenever(yansi::Condition::NEVER);
    }

    // No subcommand serves the web console with defaults
    if cli.command.is_none() {
        let state = build_state_from_env(None);
        start_server(state, DEFAULT_HOST, DEFAULT_PORT, None).await;
        return;
    }
    match cli.command.unwrap() {
        Commands::Serve {
            host,
            port,
            env_file,
            stylesheet,
        } => {
            let state = build_state_from_env(env_file.as_deref());
            start_server(state, &host, port, stylesheet).await;
        }
        Commands::CheckConfig { env_file } => {
            let state = build_state_from_env(env_file.as_deref());
            println!("Backend: {}", yansi::Paint::new(state.api.base_url()).cyan());
            let mut ok = true;
            for (name, result) in [
                ("auth", state.api.ping_auth().await),
                ("users", state.api.ping_users().await),
                ("projects", state.api.ping_projects().await),
            ] {
                match result {
                    Ok(resp) => {
                        println!("{} {}: {}", yansi::Paint::new("✓").green(), name, resp.message)
                    }
                    Err(e) => {
                        ok = false;
                        eprintln!("{} {}: {}", yansi::Paint::new("✗").red(), name, e);
                    }
                }
            }
            if ok {
                println!("{}", yansi::Paint::new("Configuration looks valid").green());
            } else {
                process::exit(1);
            }
        }
        Commands::Overview => {
            let state = build_state_from_env(None);
            match state.api.overview().await {
                Ok(overview) => print_typed(&overview),
                Err(e) => fail("Failed to fetch overview", e),
            }
        }
        Commands::Servers { sub } => {
            let state = build_state_from_env(None);
            match sub {
                ServerCommands::List => match state.api.list_servers().await {
                    Ok(servers) => {
                        let mut table = base_table();
                        table.set_header(vec!["ID", "Name", "Status"]);
                        for s in &servers {
                            table.add_row(vec![&s.id, &s.name, &s.status]);
                        }
                        println!("\n{table}\n");
                    }
                    Err(e) => fail("Failed to list servers", e),
                },
                ServerCommands::Show { server_id } => {
                    match state.api.instance_details(&server_id).await {
                        Ok(details) => print_typed(&details),
                        Err(e) => fail("Failed to fetch server details", e),
                    }
                }
                ServerCommands::Start { server_id } => match state.api.start_server(&server_id).await
                {
                    Ok(resp) => println!("{}", yansi::Paint::new(resp.message).green()),
                    Err(e) => fail("Failed to start server", e),
                },
                ServerCommands::Stop { server_id } => match state.api.stop_server(&server_id).await {
                    Ok(resp) => println!("{}", yansi::Paint::new(resp.message).green()),
                    Err(e) => fail("Failed to stop server", e),
                },
                ServerCommands::Reboot { server_id } => {
                    match state.api.reboot_server(&server_id).await {
                        Ok(resp) => println!("{}", yansi::Paint::new(resp.message).green()),
                        Err(e) => fail("Failed to reboot server", e),
                    }
                }
                ServerCommands::Delete { server_id } => {
                    match state.api.delete_server(&server_id).await {
                        Ok(resp) => println!("{}", yansi::Paint::new(resp.message).green()),
                        Err(e) => fail("Failed to delete server", e),
                    }
                }
            }
        }
        Commands::Images { sub } => {
            let state = build_state_from_env(None);
            match sub {
                ImageCommands::List => match state.api.list_images().await {
                    Ok(images) => {
                        let mut table = base_table();
                        table.set_header(vec!["ID", "Name", "Status"]);
                        for img in &images {
                            table.add_row(vec![&img.id, &img.name, &img.status]);
                        }
                        println!("\n{table}\n");
                    }
                    Err(e) => fail("Failed to list images", e),
                },
                ImageCommands::ImportUrl {
                    image_url,
                    image_name,
                    visibility,
                } => {
                    match state
                        .api
                        .import_image_from_url(&image_url, &image_name, &visibility)
                        .await
                    {
                        Ok(resp) => {
                            println!(
                                "{} (image id {})",
                                yansi::Paint::new(resp.message).green(),
                                resp.image_id
                            )
                        }
                        Err(e) => fail("Failed to import image", e),
                    }
                }
            }
        }
    }
}
