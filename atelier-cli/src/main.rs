//! atelier-cli — command-line client for the Atelier artisan directory
//!
//! Talks to the HTTP API only; it never opens the database.
//!
//! # Subcommands
//! - `export [--out <file>]`                                  — download the full offline dataset
//! - `list [--metier] [--ville] [--quartier] [--json]`        — filtered listing
//! - `search <terme> [--from <file>]`                          — match nom/metier/ville/quartier
//! - `top [--limit N] [--from <file>]`                         — best-rated artisans
//! - `status`                                                 — show server health
//!
//! `search` and `top` work on the export, either fetched or read from a file
//! written by `export --out`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Deserialize;

const DEFAULT_SERVER: &str = "http://127.0.0.1:8000";

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Debug, Parser)]
#[command(
    name = "atelier-cli",
    version,
    about = "Atelier artisan directory — offline export and listing client"
)]
struct Cli {
    /// Atelier HTTP server URL (overrides ATELIER_HTTP_URL env var)
    #[arg(long, env = "ATELIER_HTTP_URL", default_value = DEFAULT_SERVER)]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Download every artisan with its comments for offline use
    Export {
        /// Write the export to this file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// List artisans, optionally filtered (exact match, combined with AND)
    List {
        #[arg(long)]
        metier: Option<String>,

        #[arg(long)]
        ville: Option<String>,

        #[arg(long)]
        quartier: Option<String>,

        /// Print the raw JSON array
        #[arg(long)]
        json: bool,
    },

    /// Case-insensitive search over name, trade, city and neighbourhood
    Search {
        term: String,

        /// Read a saved export instead of querying the server
        #[arg(long)]
        from: Option<PathBuf>,
    },

    /// Best-rated artisans, highest note first
    Top {
        #[arg(short, long, default_value_t = 10)]
        limit: usize,

        /// Read a saved export instead of querying the server
        #[arg(long)]
        from: Option<PathBuf>,
    },

    /// Show Atelier server status
    Status,
}

// ============================================================================
// API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ArtisanRecord {
    pub id: i64,
    pub nom: String,
    pub metier: String,
    pub ville: String,
    pub quartier: String,
    pub contact: String,
    pub whatsapp: bool,
    pub note: f64,
    #[serde(default)]
    pub commentaires: Vec<serde_json::Value>,
}

// ============================================================================
// Formatting
// ============================================================================

/// Build `/api/artisans/` with the set filters as query parameters.
pub fn list_url(
    server: &str,
    metier: Option<&str>,
    ville: Option<&str>,
    quartier: Option<&str>,
) -> anyhow::Result<reqwest::Url> {
    let mut url = reqwest::Url::parse(&format!("{}/api/artisans/", server))?;
    {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in [("metier", metier), ("ville", ville), ("quartier", quartier)] {
            if let Some(v) = value.filter(|v| !v.trim().is_empty()) {
                pairs.append_pair(key, v);
            }
        }
    }
    if url.query() == Some("") {
        url.set_query(None);
    }
    Ok(url)
}

/// One human-readable line per artisan.
pub fn format_artisan(a: &ArtisanRecord) -> String {
    let whatsapp = if a.whatsapp { " (WhatsApp)" } else { "" };
    format!(
        "#{} {} — {} — {}, {} — {}{} — ★ {:.1} — {} commentaire(s)",
        a.id,
        a.nom,
        a.metier,
        a.quartier,
        a.ville,
        a.contact,
        whatsapp,
        a.note,
        a.commentaires.len()
    )
}

/// Artisans whose nom, metier, ville or quartier contains `term`, ignoring case.
pub fn search_artisans<'a>(artisans: &'a [ArtisanRecord], term: &str) -> Vec<&'a ArtisanRecord> {
    let needle = term.trim().to_lowercase();
    artisans
        .iter()
        .filter(|a| {
            [&a.nom, &a.metier, &a.ville, &a.quartier]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}

/// The `limit` best-rated artisans. Equal notes keep export (id) order.
pub fn top_rated(artisans: &[ArtisanRecord], limit: usize) -> Vec<&ArtisanRecord> {
    let mut ranked: Vec<&ArtisanRecord> = artisans.iter().collect();
    ranked.sort_by(|a, b| b.note.total_cmp(&a.note));
    ranked.truncate(limit);
    ranked
}

// ============================================================================
// HTTP Client Calls
// ============================================================================

fn client(timeout_secs: u64) -> anyhow::Result<reqwest::blocking::Client> {
    Ok(reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()?)
}

fn fetch_json(url: reqwest::Url) -> anyhow::Result<serde_json::Value> {
    let resp = client(30)?.get(url.clone()).send();

    let resp = match resp {
        Ok(r) => r,
        Err(e) => anyhow::bail!("connection failed to {}: {}", url, e),
    };

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().unwrap_or_default();
        anyhow::bail!("server returned {}: {}", status, body);
    }

    Ok(resp.json()?)
}

/// Save the export for offline use, or print it.
fn do_export(server: &str, out: Option<PathBuf>) -> anyhow::Result<()> {
    let url = reqwest::Url::parse(&format!("{}/api/export-json/", server))?;
    let export = fetch_json(url)?;
    let count = export.as_array().map(Vec::len).unwrap_or(0);
    let pretty = serde_json::to_string_pretty(&export)?;

    match out {
        Some(path) => {
            std::fs::write(&path, pretty)?;
            eprintln!("{} artisan(s) exported to {}", count, path.display());
        }
        None => println!("{}", pretty),
    }
    Ok(())
}

/// Load the export from a saved file, or fetch it from the server.
fn load_export(server: &str, from: Option<PathBuf>) -> anyhow::Result<Vec<ArtisanRecord>> {
    let body = match from {
        Some(path) => {
            let raw = std::fs::read_to_string(&path)
                .map_err(|e| anyhow::anyhow!("cannot read {}: {}", path.display(), e))?;
            serde_json::from_str(&raw)?
        }
        None => fetch_json(reqwest::Url::parse(&format!("{}/api/export-json/", server))?)?,
    };
    Ok(serde_json::from_value(body)?)
}

fn print_artisans(artisans: &[&ArtisanRecord]) {
    if artisans.is_empty() {
        eprintln!("Aucun artisan trouvé.");
        return;
    }
    for a in artisans {
        println!("{}", format_artisan(a));
    }
}

fn do_search(server: &str, term: &str, from: Option<PathBuf>) -> anyhow::Result<()> {
    let artisans = load_export(server, from)?;
    print_artisans(&search_artisans(&artisans, term));
    Ok(())
}

fn do_top(server: &str, limit: usize, from: Option<PathBuf>) -> anyhow::Result<()> {
    let artisans = load_export(server, from)?;
    print_artisans(&top_rated(&artisans, limit));
    Ok(())
}

fn do_list(
    server: &str,
    metier: Option<String>,
    ville: Option<String>,
    quartier: Option<String>,
    json_output: bool,
) -> anyhow::Result<()> {
    let url = list_url(server, metier.as_deref(), ville.as_deref(), quartier.as_deref())?;
    let body = fetch_json(url)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    let artisans: Vec<ArtisanRecord> = serde_json::from_value(body)?;
    print_artisans(&artisans.iter().collect::<Vec<_>>());
    Ok(())
}

/// Show the server status by calling GET /health.
fn do_status(server: &str) -> anyhow::Result<()> {
    let url = format!("{}/health", server);
    let resp = client(10)?.get(&url).send();

    match resp {
        Ok(r) if r.status().is_success() => {
            let body: serde_json::Value = r.json().unwrap_or_default();
            println!("Atelier server: {}", body["status"].as_str().unwrap_or("unknown"));
            println!("Version:        {}", body["version"].as_str().unwrap_or("?"));
            println!("PostgreSQL:     {}", body["postgresql"].as_str().unwrap_or("?"));
        }
        Ok(r) => anyhow::bail!("server unhealthy (HTTP {})", r.status()),
        Err(e) => anyhow::bail!("cannot reach {} — {}", url, e),
    }

    Ok(())
}

// ============================================================================
// Main
// ============================================================================

fn main() {
    let cli = Cli::parse();
    let server = cli.server.trim_end_matches('/').to_string();

    let result = match cli.command {
        Commands::Export { out } => do_export(&server, out),
        Commands::List {
            metier,
            ville,
            quartier,
            json,
        } => do_list(&server, metier, ville, quartier, json),
        Commands::Search { term, from } => do_search(&server, &term, from),
        Commands::Top { limit, from } => do_top(&server, limit, from),
        Commands::Status => do_status(&server),
    };

    if let Err(e) = result {
        eprintln!("atelier-cli: {}", e);
        std::process::exit(1);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn jean() -> ArtisanRecord {
        serde_json::from_value(serde_json::json!({
            "id": 1,
            "nom": "Jean",
            "metier": "plombier",
            "ville": "Dakar",
            "quartier": "Plateau",
            "contact": "771234567",
            "whatsapp": true,
            "note": 4.5,
            "commentaires": [
                {"id": 3, "contenu": "Rapide et efficace", "date": "2026-03-01T09:00:00Z"}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_list_url_without_filters_has_no_query() {
        let url = list_url("http://127.0.0.1:8000", None, None, None).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8000/api/artisans/");
    }

    #[test]
    fn test_list_url_encodes_filters() {
        let url = list_url(
            "http://localhost:8000",
            Some("macon"),
            Some("Saint-Louis"),
            Some("Guet Ndar"),
        )
        .unwrap();
        assert_eq!(
            url.query(),
            Some("metier=macon&ville=Saint-Louis&quartier=Guet+Ndar")
        );
    }

    #[test]
    fn test_list_url_skips_blank_filters() {
        let url = list_url("http://localhost:8000", Some(" "), Some("Dakar"), None).unwrap();
        assert_eq!(url.query(), Some("ville=Dakar"));
    }

    #[test]
    fn test_format_artisan_line() {
        let line = format_artisan(&jean());
        assert!(line.starts_with("#1 Jean — plombier — Plateau, Dakar"));
        assert!(line.contains("(WhatsApp)"));
        assert!(line.contains("★ 4.5"));
        assert!(line.ends_with("1 commentaire(s)"));
    }

    fn record(id: i64, nom: &str, metier: &str, ville: &str, note: f64) -> ArtisanRecord {
        serde_json::from_value(serde_json::json!({
            "id": id, "nom": nom, "metier": metier, "ville": ville,
            "quartier": "Centre", "contact": "770000000", "whatsapp": false, "note": note
        }))
        .unwrap()
    }

    fn ids(records: &[&ArtisanRecord]) -> Vec<i64> {
        records.iter().map(|a| a.id).collect()
    }

    #[test]
    fn test_search_matches_any_text_field_ignoring_case() {
        let artisans = vec![
            record(1, "Jean", "plombier", "Dakar", 4.0),
            record(2, "Awa", "couturier", "Thiès", 3.0),
            record(3, "Moussa", "macon", "Saint-Louis", 5.0),
        ];
        assert_eq!(ids(&search_artisans(&artisans, "PLOMB")), vec![1]);
        assert_eq!(ids(&search_artisans(&artisans, "thiès")), vec![2]);
        assert_eq!(ids(&search_artisans(&artisans, "centre")), vec![1, 2, 3]);
        assert!(search_artisans(&artisans, "menuisier").is_empty());
    }

    #[test]
    fn test_top_rated_orders_by_note_and_limits() {
        let artisans = vec![
            record(1, "Jean", "plombier", "Dakar", 4.0),
            record(2, "Awa", "couturier", "Thiès", 4.5),
            record(3, "Moussa", "macon", "Saint-Louis", 4.0),
            record(4, "Ndeye", "photographe", "Mbour", 2.0),
        ];
        assert_eq!(ids(&top_rated(&artisans, 3)), vec![2, 1, 3]);
        assert_eq!(ids(&top_rated(&artisans, 10)).len(), 4);
        assert!(top_rated(&artisans, 0).is_empty());
    }

    #[test]
    fn test_record_without_comments_defaults_to_empty() {
        let a: ArtisanRecord = serde_json::from_value(serde_json::json!({
            "id": 2, "nom": "Awa", "metier": "couturier", "ville": "Thiès",
            "quartier": "Escale", "contact": "770000000", "whatsapp": false, "note": 0.0
        }))
        .unwrap();
        assert!(a.commentaires.is_empty());
        assert!(!format_artisan(&a).contains("WhatsApp"));
    }
}
