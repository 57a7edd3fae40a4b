use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::models::NewReflection;
use crate::screens::ReflectionList;
use crate::store::ReflectionStore;

#[derive(Debug, Parser)]
#[command(version, about = "Daily quote, reflection journal and reminder service.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP service (default).
    Serve,
    /// Import reflections from an export file or a JSON array.
    Import {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Print stored reflections, most recent first.
    Reflections {
        #[arg(long)]
        tag: Option<String>,
    },
    /// Print every tag ever used.
    Tags,
}

// Accepts both the `/export` document and a bare list of reflections
#[derive(Deserialize)]
#[serde(untagged)]
enum ImportFile {
    Export { reflections: Vec<NewReflection> },
    List(Vec<NewReflection>),
}

pub async fn import_data(pool: &SqlitePool, file_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let content = fs::read_to_string(file_path)?;
    let reflections = match serde_json::from_str(&content)? {
        ImportFile::Export { reflections } => reflections,
        ImportFile::List(reflections) => reflections,
    };

    let skipped = reflections
        .iter()
        .filter(|r| r.quote_content.trim().is_empty() || r.author.trim().is_empty())
        .count();
    let valid: Vec<NewReflection> = reflections
        .into_iter()
        .filter(|r| !r.quote_content.trim().is_empty() && !r.author.trim().is_empty())
        .collect();

    let imported = ReflectionStore::new(pool.clone()).import(&valid).await?;

    tracing::info!(imported, skipped, file = %file_path.display(), "import finished");
    println!("Imported {} reflections", imported);
    if skipped > 0 {
        println!("Skipped {} reflections without quote or author", skipped);
    }
    Ok(())
}

pub async fn print_reflections(pool: &SqlitePool, tag: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let store = ReflectionStore::new(pool.clone());
    let mut list = ReflectionList::load(&store).await?;
    list.filter_by_tag(tag);

    if list.filtered.is_empty() {
        println!("No reflections yet.");
        return Ok(());
    }

    for reflection in &list.filtered {
        let created = DateTime::from_timestamp_millis(reflection.created_at)
            .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();

        println!("#{} {}", reflection.id, created);
        println!("  \"{}\" - {}", reflection.quote_content, reflection.author);
        println!("  {}", reflection.note);
        if !reflection.tags.is_empty() {
            println!("  tags: {}", reflection.tags.join(", "));
        }
    }
    Ok(())
}

pub async fn print_tags(pool: &SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
    let tags = ReflectionStore::new(pool.clone()).get_all_tags().await?;
    for tag in tags {
        println!("{}", tag);
    }
    Ok(())
}
