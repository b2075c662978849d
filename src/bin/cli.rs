//! miniresp CLI Client
//!
//! Command-line interface for talking to a RESP key-value server.

use clap::{Parser, Subcommand};
use miniresp::{Client, Reply};
use tracing_subscriber::{fmt, EnvFilter};

/// miniresp CLI
#[derive(Parser, Debug)]
#[command(name = "miniresp-cli")]
#[command(about = "CLI for RESP key-value servers")]
#[command(version)]
struct Args {
    /// Server host
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Server port
    #[arg(short, long, default_value = "6379")]
    port: u16,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Set {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// Delete a key
    Del {
        /// The key to delete
        key: String,
    },

    /// Append an element to a list
    Rpush {
        /// The list key
        key: String,

        /// The element to append
        element: String,
    },

    /// Pop from a list, blocking up to a timeout
    Blpop {
        /// The list key
        key: String,

        /// Timeout in seconds
        secs: u64,
    },

    /// Add members to a set
    Sadd {
        /// The set name
        set: String,

        /// One or more members
        #[arg(required = true)]
        values: Vec<String>,
    },

    /// List all members of a set
    Smembers {
        /// The set name
        set: String,
    },

    /// Check set membership
    Sismember {
        /// The set name
        set: String,

        /// The member to check
        value: String,
    },

    /// Remove members from a set
    Srem {
        /// The set name
        set: String,

        /// One or more members
        #[arg(required = true)]
        values: Vec<String>,
    },

    /// Ping the server
    Ping,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,miniresp=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let args = Args::parse();

    let mut client = Client::new(args.host, args.port);

    let result = match &args.command {
        Commands::Get { key } => client.get(key),
        Commands::Set { key, value } => client.set(key, value),
        Commands::Del { key } => client.del(key),
        Commands::Rpush { key, element } => client.rpush(key, element),
        Commands::Blpop { key, secs } => client.blpop(key, *secs),
        Commands::Sadd { set, values } => {
            let values: Vec<&str> = values.iter().map(String::as_str).collect();
            client.sadd(set, &values)
        }
        Commands::Smembers { set } => client.smembers(set),
        Commands::Sismember { set, value } => client.sismember(set, value),
        Commands::Srem { set, values } => {
            let values: Vec<&str> = values.iter().map(String::as_str).collect();
            client.srem(set, &values)
        }
        Commands::Ping => client.ping(),
    };

    match result {
        Ok(Some(reply)) => println!("{}", reply),
        // call only defers replies in pipeline mode, which the CLI never enters
        Ok(None) => println!("{}", Reply::Nil),
        Err(e) => {
            eprintln!("(error) {}", e);
            std::process::exit(1);
        }
    }
}
