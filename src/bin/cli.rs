use clap::{Parser, Subcommand};
use inventory_api::{
    config::AppConfig,
    db,
    models::{PageRequest, ProductFilter, UserFilter},
    repositories::{SqliteProductRepository, SqliteUserRepository},
    services::{ProductService, UserService},
    validators::{self, ValidationErrors},
};
use rand::{distributions::Alphanumeric, Rng};
use serde_json::json;
use std::sync::Arc;

const GENERATED_PASSWORD_LENGTH: usize = 16;

#[derive(Parser)]
#[command(name = "inventory-cli")]
#[command(about = "CLI tool for managing inventory users and products", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// User management commands
    User {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Product inspection commands
    Product {
        #[command(subcommand)]
        command: ProductCommands,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Create a new user
    Create {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password (will prompt if not provided)
        #[arg(short, long, conflicts_with = "generate_password")]
        password: Option<String>,

        /// Generate a random password and print it
        #[arg(long)]
        generate_password: bool,

        /// Create the user with the admin role
        #[arg(long)]
        admin: bool,

        /// Create the account deactivated
        #[arg(long)]
        inactive: bool,
    },

    /// List users, newest first
    List {
        /// Page to display
        #[arg(long, default_value_t = 1)]
        page: i64,

        /// Users per page
        #[arg(short, long, default_value_t = 20)]
        limit: i64,

        /// Substring matched against name or email
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Delete a user
    Delete {
        /// Email address of the user to delete
        #[arg(short, long)]
        email: String,
    },

    /// Activate an inactive user or deactivate an active one
    ToggleActive {
        /// Email address of the user
        #[arg(short, long)]
        email: String,
    },

    /// Set a new password for a user
    SetPassword {
        /// Email address of the user
        #[arg(short, long)]
        email: String,

        /// New password (will prompt if not provided)
        #[arg(short, long, conflicts_with = "generate_password")]
        password: Option<String>,

        /// Generate a random password and print it
        #[arg(long)]
        generate_password: bool,
    },
}

#[derive(Subcommand)]
enum ProductCommands {
    /// List products
    List {
        /// Page to display
        #[arg(long, default_value_t = 1)]
        page: i64,

        /// Products per page
        #[arg(short, long, default_value_t = 20)]
        limit: i64,

        /// Only active (true) or inactive (false) products
        #[arg(short, long)]
        active: Option<bool>,
    },
}

fn get_password(prompt: &str) -> Result<String, Box<dyn std::error::Error>> {
    use std::io::{self, Write};
    print!("{}: ", prompt);
    io::stdout().flush()?;

    Ok(rpassword::read_password()?)
}

/// Resolves the password from the flag, a generated value or a confirmed prompt.
fn resolve_password(
    given: Option<String>,
    generate: bool,
    prompt: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    if let Some(password) = given {
        return Ok(password);
    }

    if generate {
        let password: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(GENERATED_PASSWORD_LENGTH)
            .map(char::from)
            .collect();
        println!("🔑 Generated password: {}", password);
        return Ok(password);
    }

    let password = get_password(prompt)?;
    let confirm = get_password("Confirm password")?;
    if password != confirm {
        eprintln!("❌ Passwords do not match");
        std::process::exit(1);
    }

    Ok(password)
}

fn report_invalid(errors: &ValidationErrors) -> ! {
    eprintln!("❌ Invalid input:");
    for field in errors.fields() {
        for message in errors.field(field).unwrap_or_default() {
            eprintln!("  {}: {}", field, message);
        }
    }
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;

    // Connect to database
    let pool = db::create_pool(&config.database_url, config.db_max_connections).await?;

    // Run migrations
    db::run_migrations(&pool).await?;

    // Initialize services
    let user_service = UserService::new(Arc::new(SqliteUserRepository::new(pool.clone())));
    let product_service =
        ProductService::new(Arc::new(SqliteProductRepository::new(pool.clone())));

    // Parse CLI arguments
    let cli = Cli::parse();

    match cli.command {
        Commands::User { command } => match command {
            UserCommands::Create {
                name,
                email,
                password,
                generate_password,
                admin,
                inactive,
            } => {
                let password = resolve_password(password, generate_password, "Password")?;

                let body = json!({
                    "name": name,
                    "email": email,
                    "password": password,
                    "role": if admin { "admin" } else { "user" },
                    "is_active": !inactive,
                });
                let payload = validators::validate_create_user(&body)
                    .unwrap_or_else(|errors| report_invalid(&errors));

                match user_service.create_user(payload).await {
                    Ok(user) => {
                        println!("✅ User created successfully!");
                        println!("  ID: {}", user.id);
                        println!("  Email: {}", user.email);
                        println!("  Role: {}", user.role);
                        println!("  Active: {}", user.is_active);
                    }
                    Err(err) => {
                        eprintln!("❌ Failed to create user: {}", err);
                        std::process::exit(1);
                    }
                }
            }

            UserCommands::List {
                page,
                limit,
                search,
            } => {
                let filter = UserFilter {
                    search,
                    is_active: None,
                };

                match user_service
                    .list_users(filter, PageRequest::new(page, limit))
                    .await
                {
                    Ok(result) => {
                        if result.data.is_empty() {
                            println!("No users found.");
                        } else {
                            println!(
                                "{:<5} {:<30} {:<40} {:<6} {:<7} {:<20}",
                                "ID", "Name", "Email", "Role", "Active", "Created"
                            );
                            println!("{}", "-".repeat(112));
                            for user in &result.data {
                                println!(
                                    "{:<5} {:<30} {:<40} {:<6} {:<7} {:<20}",
                                    user.id,
                                    user.name,
                                    user.email,
                                    user.role,
                                    if user.is_active { "Yes" } else { "No" },
                                    user.created_at.format("%Y-%m-%d %H:%M:%S")
                                );
                            }
                            println!(
                                "Page {} of {} ({} users)",
                                result.meta.current_page, result.meta.last_page, result.meta.total
                            );
                        }
                    }
                    Err(err) => {
                        eprintln!("❌ Failed to list users: {}", err);
                        std::process::exit(1);
                    }
                }
            }

            UserCommands::Delete { email } => match user_service.find_user_by_email(&email).await {
                Ok(Some(user)) => match user_service.delete_user(user.id).await {
                    Ok(()) => {
                        println!("✅ User '{}' deleted successfully!", email);
                    }
                    Err(err) => {
                        eprintln!("❌ Failed to delete user: {}", err);
                        std::process::exit(1);
                    }
                },
                Ok(None) => {
                    eprintln!("❌ User '{}' not found", email);
                    std::process::exit(1);
                }
                Err(err) => {
                    eprintln!("❌ Failed to find user: {}", err);
                    std::process::exit(1);
                }
            },

            UserCommands::ToggleActive { email } => {
                match user_service.find_user_by_email(&email).await {
                    Ok(Some(user)) => match user_service.toggle_active(user.id).await {
                        Ok(user) if user.is_active => {
                            println!("✅ User '{}' activated", email);
                        }
                        Ok(_) => {
                            println!("✅ User '{}' deactivated", email);
                        }
                        Err(err) => {
                            eprintln!("❌ Failed to toggle user status: {}", err);
                            std::process::exit(1);
                        }
                    },
                    Ok(None) => {
                        eprintln!("❌ User '{}' not found", email);
                        std::process::exit(1);
                    }
                    Err(err) => {
                        eprintln!("❌ Failed to find user: {}", err);
                        std::process::exit(1);
                    }
                }
            }

            UserCommands::SetPassword {
                email,
                password,
                generate_password,
            } => match user_service.find_user_by_email(&email).await {
                Ok(Some(user)) => {
                    let password =
                        resolve_password(password, generate_password, "New password")?;
                    let changes = validators::validate_update_user(&json!({ "password": password }))
                        .unwrap_or_else(|errors| report_invalid(&errors));

                    match user_service.update_user(user, changes).await {
                        Ok(_) => {
                            println!("✅ Password updated successfully for '{}'!", email);
                        }
                        Err(err) => {
                            eprintln!("❌ Failed to update password: {}", err);
                            std::process::exit(1);
                        }
                    }
                }
                Ok(None) => {
                    eprintln!("❌ User '{}' not found", email);
                    std::process::exit(1);
                }
                Err(err) => {
                    eprintln!("❌ Failed to find user: {}", err);
                    std::process::exit(1);
                }
            },
        },

        Commands::Product { command } => match command {
            ProductCommands::List {
                page,
                limit,
                active,
            } => {
                match product_service
                    .list_products(ProductFilter { active }, PageRequest::new(page, limit))
                    .await
                {
                    Ok(result) => {
                        if result.data.is_empty() {
                            println!("No products found.");
                        } else {
                            println!(
                                "{:<5} {:<40} {:>10} {:>7} {:<7}",
                                "ID", "Name", "Price", "Stock", "Active"
                            );
                            println!("{}", "-".repeat(73));
                            for product in &result.data {
                                println!(
                                    "{:<5} {:<40} {:>10} {:>7} {:<7}",
                                    product.id,
                                    product.name,
                                    product.price,
                                    product.stock,
                                    if product.active { "Yes" } else { "No" }
                                );
                            }
                            println!(
                                "Page {} of {} ({} products)",
                                result.meta.current_page, result.meta.last_page, result.meta.total
                            );
                        }
                    }
                    Err(err) => {
                        eprintln!("❌ Failed to list products: {}", err);
                        std::process::exit(1);
                    }
                }
            }
        },
    }

    pool.close().await;
    Ok(())
}
