//! Clap derive structures for the `shopsphere` CLI.
//!
//! Only depends on `clap` and `clap_complete` so `build.rs` can include it
//! for man page generation.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// shopsphere -- wishlist management for ShopSphere storefronts
#[derive(Debug, Parser)]
#[command(
    name = "shopsphere",
    version,
    about = "Manage your ShopSphere wishlist from the command line",
    long_about = "Command-line client for a ShopSphere storefront.\n\n\
        Lists, adds, removes, and checks wishlist products over the storefront\n\
        REST API. Bearer tokens live in the system keyring; expired sessions\n\
        are refreshed once automatically.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Storefront profile to use
    #[arg(long, short = 'p', env = "SHOPSPHERE_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API base URL (overrides profile)
    #[arg(long, short = 'u', env = "SHOPSPHERE_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Bearer token for this invocation only (bypasses the keyring)
    #[arg(long, env = "SHOPSPHERE_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SHOPSPHERE_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "SHOPSPHERE_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "SHOPSPHERE_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// View and edit your wishlist
    #[command(alias = "wl", alias = "w")]
    Wishlist(WishlistArgs),

    /// Log in and store the session token
    Login(LoginArgs),

    /// Forget the stored session token
    Logout,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Wishlist ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WishlistArgs {
    #[command(subcommand)]
    pub command: WishlistCommand,
}

#[derive(Debug, Subcommand)]
pub enum WishlistCommand {
    /// List wishlist products
    #[command(alias = "ls")]
    List,

    /// Add a product to the wishlist
    Add {
        /// Product ID
        product_id: u64,
    },

    /// Remove a product from the wishlist
    #[command(alias = "rm")]
    Remove {
        /// Product ID
        product_id: u64,
    },

    /// Check whether products are in the wishlist
    Check {
        /// Product IDs
        #[arg(required = true, num_args = 1..)]
        product_ids: Vec<u64>,
    },
}

// ── Auth ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account username (prompted if omitted)
    #[arg(long, env = "SHOPSPHERE_USERNAME")]
    pub username: Option<String>,

    /// Read the password from the first line of stdin
    #[arg(long)]
    pub password_stdin: bool,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create or update a profile with guided setup
    Init {
        /// Take values from flags and defaults instead of prompting
        #[arg(long)]
        non_interactive: bool,
    },

    /// Display the current configuration (tokens redacted)
    Show,

    /// Print the config file location
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
