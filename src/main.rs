use std::io::{self, Write};
use std::sync::Arc;

use chatbot_console::models::auth::Role;
use chatbot_console::offline::select_source;
use chatbot_console::session::{spawn_expiry_watch, SessionStore};
use chatbot_console::ui;
use chatbot_console::{ApiClient, ApiError, AppConfig, AuthGateway, Queries};

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_logging().expect("Failed to initialize logging");

    let config = AppConfig::from_env();
    let store = Arc::new(SessionStore::new(config.session_file.clone()));
    let client = ApiClient::new(config.api_url.clone(), store.clone());
    let gateway = AuthGateway::new(client.clone(), store.clone());
    let queries = Queries::new(select_source(&config, client.clone()));

    println!("💬 Support Console");
    println!("==========================================");
    println!("Backend: {}", config.api_url);
    println!("Type 'help' for the command list.");
    println!();

    let mut expiry_watch: Option<tokio::task::JoinHandle<()>> = None;

    match store.get() {
        Some(session) if !session.is_expired() => {
            println!("👋 Welcome back, {} ({})", session.email, session.role);
            expiry_watch = Some(spawn_expiry_watch(store.clone()));
        }
        Some(_) => {
            tracing::info!("Stored session already expired, clearing");
            store.clear();
        }
        None => {}
    }

    loop {
        print!("> ");
        if io::stdout().flush().is_err() {
            break;
        }
        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) => break, // EOF
            Ok(_) => {}
            Err(e) => {
                eprintln!("❌ Failed to read input: {}", e);
                break;
            }
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((&command, args)) = tokens.split_first() else {
            continue;
        };

        match command {
            "help" => print_help(),
            "quit" | "exit" => break,

            "login" => match read_credentials() {
                Ok((email, password)) => match gateway.login(&email, &password).await {
                    Ok(session) => {
                        println!("✅ Logged in as {} ({})", session.email, session.role);
                        restart_watch(&mut expiry_watch, &store);
                    }
                    Err(e) => report(&e),
                },
                Err(e) => eprintln!("❌ {}", e),
            },

            "register" => match read_registration() {
                Ok((username, email, password)) => {
                    match gateway.register(&username, &email, &password).await {
                        Ok(session) => {
                            println!("✅ Registered and logged in as {}", session.email);
                            restart_watch(&mut expiry_watch, &store);
                        }
                        Err(e) => report(&e),
                    }
                }
                Err(e) => eprintln!("❌ {}", e),
            },

            "logout" => {
                store.clear();
                queries.clear_cache();
                if let Some(watch) = expiry_watch.take() {
                    watch.abort();
                }
                println!("👋 Logged out.");
            }

            "whoami" => match store.get() {
                Some(session) => {
                    println!("{} ({}), token expires at {}", session.email, session.role, session.expires_at)
                }
                None => println!("Not logged in."),
            },

            "chat" => {
                if args.is_empty() {
                    println!("Usage: chat <message>");
                    continue;
                }
                let input = args.join(" ");
                match queries.send_message(&input).await {
                    Ok(reply) => {
                        let exchange =
                            chatbot_console::models::chat::ChatExchange::local(input, reply.data);
                        print!("{}", ui::render_exchange(&exchange));
                    }
                    Err(e) => report(&e),
                }
            }

            "history" => {
                let page = parse_page(args);
                match queries.chat_history(page, 10).await {
                    Ok(listing) => println!("{}", ui::render_transcript(&listing)),
                    Err(e) => report(&e),
                }
            }

            "users" => {
                if !require_admin(&store) {
                    continue;
                }
                let page = parse_page(args);
                match queries.users(page, 10).await {
                    Ok(listing) => println!("{}", ui::render_users(&listing)),
                    Err(e) => report(&e),
                }
            }

            "sessions" => {
                if !require_admin(&store) {
                    continue;
                }
                let page = parse_page(args);
                match queries.sessions(page, 5).await {
                    Ok(listing) => println!("{}", ui::render_sessions(&listing)),
                    Err(e) => report(&e),
                }
            }

            "messages" => {
                if !require_admin(&store) {
                    continue;
                }
                let Some(session_id) = args.first() else {
                    println!("Usage: messages <session_id> [page]");
                    continue;
                };
                let page = parse_page(&args[1..]);
                match queries.session_messages(session_id, page, 10).await {
                    Ok(listing) => println!("{}", ui::render_transcript(&listing)),
                    Err(e) => report(&e),
                }
            }

            "stats" => {
                if !require_admin(&store) {
                    continue;
                }
                match tokio::try_join!(queries.user_count(), queries.session_count()) {
                    Ok((users, sessions)) => {
                        println!("{}", ui::render_stats(users.total_users, sessions.total_sessions))
                    }
                    Err(e) => report(&e),
                }
            }

            other => println!("Unknown command '{}'. Type 'help'.", other),
        }
    }

    if let Some(watch) = expiry_watch.take() {
        watch.abort();
    }
    println!("Bye!");
}

fn print_help() {
    println!("Commands:");
    println!("  login                      authenticate with email and password");
    println!("  register                   create an account, then log in");
    println!("  logout                     clear the stored session");
    println!("  whoami                     show the current identity");
    println!("  chat <message>             send a message to the support bot");
    println!("  history [page]             your past exchanges");
    println!("  users [page]               (admin) list accounts");
    println!("  sessions [page]            (admin) list chat sessions");
    println!("  messages <id> [page]       (admin) transcript of one session");
    println!("  stats                      (admin) dashboard counts");
    println!("  quit                       leave the console");
}

/// Central error display. Token and authorization failures have already
/// cleared the session by the time they reach us. The console's analog of
/// the login redirect is dropping the user back at the prompt.
fn report(error: &ApiError) {
    if error.requires_login() {
        println!("🔒 Your session has ended ({}). Please 'login' again.", error);
    } else {
        eprintln!("❌ {}", error);
    }
}

fn restart_watch(
    watch: &mut Option<tokio::task::JoinHandle<()>>,
    store: &Arc<SessionStore>,
) {
    if let Some(previous) = watch.take() {
        previous.abort();
    }
    *watch = Some(spawn_expiry_watch(store.clone()));
}

/// Admin commands are gated client-side on the session role; the backend
/// enforces the real check.
fn require_admin(store: &Arc<SessionStore>) -> bool {
    match store.get() {
        Some(session) if session.role == Role::Admin => true,
        Some(_) => {
            println!("⛔ Admin access required.");
            false
        }
        None => {
            println!("🔒 Please 'login' first.");
            false
        }
    }
}

fn parse_page(args: &[&str]) -> u32 {
    args.first()
        .and_then(|raw| raw.parse::<u32>().ok())
        .filter(|&page| page >= 1)
        .unwrap_or(1)
}

fn prompt_line(label: &str) -> io::Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;
    let mut value = String::new();
    io::stdin().read_line(&mut value)?;
    Ok(value.trim().to_string())
}

fn read_credentials() -> io::Result<(String, String)> {
    let email = prompt_line("Email address")?;
    print!("Password: ");
    io::stdout().flush()?;
    let password = rpassword::read_password()?;
    Ok((email, password))
}

fn read_registration() -> io::Result<(String, String, String)> {
    let username = prompt_line("Username")?;
    let email = prompt_line("Email address")?;
    print!("Password: ");
    io::stdout().flush()?;
    let password = rpassword::read_password()?;
    print!("Password (again): ");
    io::stdout().flush()?;
    let confirm = rpassword::read_password()?;
    if password != confirm {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "Passwords don't match",
        ));
    }
    Ok((username, email, password))
}

fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, fmt, Layer};

    // Get log level from environment or default to INFO for production
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            "debug,chatbot_console=trace,reqwest=info,hyper=info".to_string()
        } else {
            "info,chatbot_console=info,reqwest=warn,hyper=warn".to_string()
        }
    });

    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&log_level))?;

    let fmt_layer = if std::env::var("LOG_FORMAT").as_deref() == Ok("json") {
        // JSON logging for production (easier for log aggregation)
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_target(true)
            .boxed()
    } else {
        // Human-readable logging for development
        fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("💬 Support Console starting up...");
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Build mode: {}",
        if cfg!(debug_assertions) { "development" } else { "production" }
    );

    Ok(())
}
