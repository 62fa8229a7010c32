use std::time::Duration;

use crate::ai::collaborator::{MappingCollaborator, WorkerClient};
use crate::ai::mapping_model::{MappingEnvelope, MappingRequest};
use crate::ai::ollama::{OllamaMapper, respond};
use crate::browser::session::BrowserSession;
use crate::cli::config::{AppConfig, ProfileAction};
use crate::document::static_page::StaticDocument;
use crate::engine::FillEngine;
use crate::matching::scorer::Scorer;
use crate::profile::profile_model::{FormEntry, Profile};
use crate::profile::store::ProfileStore;
use crate::report::console::format_console_report;
use crate::report::report_model::FillReport;
use crate::trace::logger::TraceLogger;

// ============================================================================
// Builders shared by the subcommands
// ============================================================================

/// Build the mapping collaborator named by `kind`. `off` yields `None`.
pub fn build_collaborator(
    kind: &str,
    config: &AppConfig,
) -> Result<Option<Box<dyn MappingCollaborator>>, Box<dyn std::error::Error>> {
    let timeout = config.mapper.timeout_secs.map(Duration::from_secs);

    match kind {
        "off" | "none" => Ok(None),
        "worker" => {
            let endpoint = &config.mapper.worker_endpoint;
            let client = match timeout {
                Some(t) => WorkerClient::with_timeout(endpoint, t)?,
                None => WorkerClient::new(endpoint),
            };
            Ok(Some(Box::new(client)))
        }
        "ollama" => {
            let mut mapper = OllamaMapper::default();
            if let Some(endpoint) = &config.mapper.ollama_endpoint {
                mapper.endpoint = endpoint.clone();
            }
            if let Some(model) = &config.mapper.ollama_model {
                mapper.model = model.clone();
            }
            if let Some(t) = timeout {
                mapper = mapper.with_timeout(t)?;
            }
            Ok(Some(Box::new(mapper)))
        }
        other => Err(format!("Unknown mapper '{}'. Use: worker, ollama, off", other).into()),
    }
}

/// Engine with the configured dictionary, collaborator and trace file.
pub fn build_engine(
    config: &AppConfig,
    mapper: Option<&str>,
    trace: Option<&str>,
) -> Result<FillEngine, Box<dyn std::error::Error>> {
    let scorer = match &config.keywords {
        Some(dictionary) => Scorer::new(dictionary.clone()),
        None => Scorer::default(),
    };

    let mut engine = FillEngine::new(scorer);

    let kind = mapper.unwrap_or(&config.mapper.kind);
    if let Some(collaborator) = build_collaborator(kind, config)? {
        engine = engine.with_collaborator(collaborator);
    }

    if let Some(path) = trace {
        engine = engine.with_tracer(TraceLogger::new(path));
    }

    Ok(engine)
}

/// Pick the profile by id or name, or fall back to the first stored one.
pub fn select_profile<'s>(
    store: &'s ProfileStore,
    wanted: Option<&str>,
) -> Result<&'s Profile, Box<dyn std::error::Error>> {
    match wanted {
        Some(id_or_name) => store
            .find(id_or_name)
            .ok_or_else(|| format!("Profile not found: {}", id_or_name).into()),
        None => store
            .default_profile()
            .ok_or_else(|| "No profiles available to fill.".into()),
    }
}

// ============================================================================
// fill subcommand
// ============================================================================

#[allow(clippy::too_many_arguments)]
pub fn cmd_fill(
    config: &AppConfig,
    profiles: &str,
    profile: Option<&str>,
    page: Option<&str>,
    url: Option<&str>,
    mapper: Option<&str>,
    output: Option<&str>,
    json: bool,
    trace: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = ProfileStore::open(profiles)?;
    let profile = select_profile(&store, profile)?;
    let engine = build_engine(config, mapper, trace)?;

    let report = match (page, url) {
        (Some(path), _) => {
            let mut doc = StaticDocument::load(path)?;
            let report = engine.match_and_fill(&mut doc, profile);
            if let Some(out) = output {
                std::fs::write(out, serde_json::to_string_pretty(doc.snapshot())?)?;
            }
            report
        }
        (None, Some(url)) => {
            let mut session = BrowserSession::launch(&config.browser.server_script)?;
            session.navigate(url)?;
            let report = engine.match_and_fill(&mut session, profile);
            session.quit()?;
            report
        }
        (None, None) => return Err("Either --page or --url is required".into()),
    };

    print_report(&report, json)
}

fn print_report(report: &FillReport, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print!("{}", format_console_report(report));
    }
    Ok(())
}

// ============================================================================
// extract subcommand
// ============================================================================

pub fn cmd_extract(
    config: &AppConfig,
    page: Option<&str>,
    url: Option<&str>,
    save_as: Option<&str>,
    profiles: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let engine = FillEngine::default();

    let entries: Vec<FormEntry> = match (page, url) {
        (Some(path), _) => {
            let mut doc = StaticDocument::load(path)?;
            engine.extract_form_data(&mut doc)?
        }
        (None, Some(url)) => {
            let mut session = BrowserSession::launch(&config.browser.server_script)?;
            session.navigate(url)?;
            let entries = engine.extract_form_data(&mut session)?;
            session.quit()?;
            entries
        }
        (None, None) => return Err("Either --page or --url is required".into()),
    };

    println!("{}", serde_json::to_string_pretty(&entries)?);

    if let Some(name) = save_as {
        if entries.is_empty() {
            eprintln!("No form data found to save.");
            return Ok(());
        }
        let mut store = ProfileStore::open(profiles)?;
        let profile = Profile::from_form_data(Some(name), &entries);
        eprintln!("Saved profile '{}' ({} fields) as {}", profile.name, profile.fields.len(), profile.id);
        store.save_profile(profile)?;
    }

    Ok(())
}

// ============================================================================
// map subcommand
// ============================================================================

/// Answer a mapping request the way the mapping endpoint does.
pub fn cmd_map(
    config: &AppConfig,
    request_path: &str,
    mapper: Option<&str>,
) -> Result<MappingEnvelope, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(request_path)?;

    let request: MappingRequest = match serde_json::from_str(&content) {
        Ok(r) => r,
        Err(_) => return Ok(MappingEnvelope::failed("formFields and profileKeys are required.")),
    };

    let kind = mapper.unwrap_or(&config.mapper.kind);
    let collaborator = build_collaborator(kind, config)?
        .ok_or("The map command needs a mapper (worker or ollama)")?;

    Ok(respond(collaborator.as_ref(), &request))
}

// ============================================================================
// profiles subcommand
// ============================================================================

pub fn cmd_profiles(profiles: &str, action: &ProfileAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = ProfileStore::open(profiles)?;

    match action {
        ProfileAction::List => {
            if store.profiles().is_empty() {
                println!("No profiles stored in {}", profiles);
            }
            for p in store.profiles() {
                println!("{}  {} ({} fields)", p.id, p.name, p.fields.len());
            }
        }
        ProfileAction::Export { output } => {
            let json = store.export_json()?;
            match output {
                Some(path) => std::fs::write(path, json)?,
                None => println!("{}", json),
            }
        }
        ProfileAction::Import { file } => {
            let content = std::fs::read_to_string(file)?;
            let count = store.import_json(&content)?;
            println!("Imported {} profiles", count);
        }
        ProfileAction::Delete { id } => {
            store.delete_profile(id)?;
            println!("Deleted profile {}", id);
        }
    }

    Ok(())
}
