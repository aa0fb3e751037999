//! Translating command-line browse options into engine operations.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use catalog_engine::{BrowseEngine, ViewMode};
use catalog_model::{FieldValue, ListingSchema};
use tracing::warn;

/// Everything `catalog browse` can ask of a loaded listing.
#[derive(Debug, Clone, Default)]
pub struct BrowseOptions {
    pub query: Option<String>,
    pub facets: Vec<(String, String)>,
    pub mode: Option<ViewMode>,
    pub collapse: Vec<String>,
    pub collapse_all: bool,
    pub page: Option<usize>,
}

/// Parse `FIELD=VALUE`.
pub fn parse_facet_arg(arg: &str) -> std::result::Result<(String, String), String> {
    let (field, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{arg}'"))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(format!("missing facet field in '{arg}'"));
    }
    Ok((field.to_string(), value.trim().to_string()))
}

/// Resolve the schema from a preset name or a JSON file.
pub fn resolve_schema(listing: Option<&str>, schema_file: Option<&Path>) -> Result<ListingSchema> {
    let schema = match (listing, schema_file) {
        (Some(name), _) => ListingSchema::preset(name)?,
        (None, Some(path)) => {
            let bytes = std::fs::read(path)
                .with_context(|| format!("failed to read schema {}", path.display()))?;
            serde_json::from_slice::<ListingSchema>(&bytes)
                .with_context(|| format!("invalid schema {}", path.display()))?
        }
        (None, None) => bail!("either --listing or --schema is required"),
    };
    schema.validate()?;
    Ok(schema)
}

/// Match a typed facet value against the values the facet actually takes.
///
/// Display text is compared first so `007` stays text when the catalog
/// stores it as text; otherwise digits become an integer.
pub fn facet_value(engine: &BrowseEngine, field: &str, input: &str) -> FieldValue {
    engine
        .facet_index()
        .values(field)
        .and_then(|values| values.iter().find(|v| v.to_string() == input))
        .cloned()
        .unwrap_or_else(|| FieldValue::parse(input))
}

/// Apply browse options in the order a user would: search, facets, layout,
/// collapsing, then page.
pub fn apply_options(engine: &mut BrowseEngine, options: &BrowseOptions) -> Result<()> {
    if let Some(query) = &options.query {
        engine.on_keystroke(query, Instant::now());
        engine.flush_search();
    }

    for (field, input) in &options.facets {
        let value = facet_value(engine, field, input);
        engine.select_facet(field, Some(value))?;
    }

    if let Some(mode) = options.mode {
        if mode == ViewMode::Grouped && !engine.schema().is_partitioned() {
            bail!("listing '{}' has no partition field", engine.schema().name);
        }
        engine.set_view_mode(mode);
    }

    for key in &options.collapse {
        if engine.expansion().is_expanded(key) {
            engine.toggle_partition(key);
        }
    }

    if options.collapse_all {
        // The first toggle makes every group uniformly expanded when the
        // flags were mixed or implicit; the second collapses them.
        if engine.toggle_all() == Some(true) {
            engine.toggle_all();
        }
    }

    if let Some(page) = options.page
        && !engine.go_to_page(page)
        && page != engine.current_page()
    {
        warn!(
            page,
            total_pages = engine.total_pages(),
            "page out of range, staying on page {}",
            engine.current_page()
        );
    }

    Ok(())
}
