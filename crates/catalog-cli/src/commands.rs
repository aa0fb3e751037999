//! Command implementations.

use std::path::Path;

use anyhow::{Context, Result, bail};
use catalog_cli::browse::{BrowseOptions, apply_options, resolve_schema};
use catalog_cli::render::{facets_table, listings_table, render_view};
use catalog_engine::ViewMode;
use catalog_model::{FieldValue, ListingSchema, RecordId};
use catalog_session::{JsonFileSource, ListingSession};
use tracing::info;

use crate::cli::{BrowseArgs, BumpArgs, FacetsArgs, SchemaArgs};

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("failed to start the async runtime")
}

fn schema_from_args(args: &SchemaArgs) -> Result<ListingSchema> {
    resolve_schema(args.listing.as_deref(), args.schema.as_deref())
}

/// Open a session on a catalog file and wait for the first fetch.
///
/// A file that cannot be read still yields a session (showing no data);
/// the cause is logged by the session.
async fn open_session(
    schema: ListingSchema,
    file: &Path,
) -> Result<ListingSession<JsonFileSource>> {
    let mut session = ListingSession::new(schema, JsonFileSource::new(file))?;
    let loaded = session.refresh().await;
    info!(file = %file.display(), records = loaded, "catalog opened");
    Ok(session)
}

pub fn run_browse(args: &BrowseArgs) -> Result<()> {
    let schema = schema_from_args(&args.schema)?;
    let options = BrowseOptions {
        query: args.query.clone(),
        facets: args.facets.clone(),
        mode: if args.grouped {
            Some(ViewMode::Grouped)
        } else if args.flat {
            Some(ViewMode::Flat)
        } else {
            None
        },
        collapse: args.collapse.clone(),
        collapse_all: args.collapse_all,
        page: args.page,
    };

    runtime()?.block_on(browse(schema, args, &options))
}

async fn browse(schema: ListingSchema, args: &BrowseArgs, options: &BrowseOptions) -> Result<()> {
    let mut session = open_session(schema, &args.file).await?;
    apply_options(session.engine_mut(), options)?;
    let view = session.view();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", render_view(&view, session.engine().schema()));
    }
    Ok(())
}

pub fn run_facets(args: &FacetsArgs) -> Result<()> {
    let schema = schema_from_args(&args.schema)?;
    runtime()?.block_on(facets(schema, &args.file))
}

async fn facets(schema: ListingSchema, file: &Path) -> Result<()> {
    let session = open_session(schema, file).await?;
    println!("{}", facets_table(session.engine().facet_index().facets()));
    Ok(())
}

/// Returns whether the new value reached the file.
pub fn run_bump(args: &BumpArgs) -> Result<bool> {
    let id = RecordId::new(&args.id)?;
    // Any schema will do: bumping never filters.
    let schema = ListingSchema::new("bump");
    runtime()?.block_on(bump(schema, id, args))
}

async fn bump(schema: ListingSchema, id: RecordId, args: &BumpArgs) -> Result<bool> {
    let mut session = open_session(schema, &args.file).await?;
    if session.engine().store().get(&id).is_none() {
        bail!("no record '{}' in {}", id, args.file.display());
    }
    let handle = session.increment(&id, &args.field)?;
    let persisted = handle.await.context("write task failed")?;
    let value = session
        .engine()
        .store()
        .get(&id)
        .and_then(|record| record.get(&args.field))
        .and_then(FieldValue::as_integer)
        .unwrap_or_default();
    if persisted {
        println!("{id}: {} = {value}", args.field);
    } else {
        println!("{id}: {} = {value} (not saved)", args.field);
    }
    Ok(persisted)
}

pub fn run_listings() {
    println!("{}", listings_table());
}
