//! Terminal rendering of browse views with comfy-table.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use catalog_engine::{BrowseView, FacetValues, PartitionView, ViewBody, ViewStatus};
use catalog_model::{ListingSchema, PRESET_NAMES, Record};

/// Label for records without a partition value.
pub const UNPARTITIONED_LABEL: &str = "(none)";

/// Columns shown for a listing: id, search fields, facets, then the
/// partition field, each once.
pub fn columns(schema: &ListingSchema) -> Vec<&str> {
    let mut columns: Vec<&str> = Vec::new();
    let candidates = schema
        .search_fields
        .iter()
        .chain(schema.facets.iter().map(|f| &f.field))
        .chain(schema.partition_field.iter());
    for field in candidates {
        if !columns.contains(&field.as_str()) {
            columns.push(field);
        }
    }
    columns
}

pub fn record_table(schema: &ListingSchema, records: &[&Record]) -> Table {
    let fields = columns(schema);
    let mut table = Table::new();
    let mut header = vec![header_cell("ID")];
    header.extend(fields.iter().map(|f| header_cell(f)));
    table.set_header(header);
    apply_table_style(&mut table);
    for record in records {
        let mut row = vec![Cell::new(record.id.as_str())];
        row.extend(fields.iter().map(|field| match record.get(field) {
            Some(value) => Cell::new(value),
            None => dim_cell("-"),
        }));
        table.add_row(row);
    }
    table
}

pub fn facets_table(facets: &[FacetValues]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Facet"),
        header_cell("Values"),
        header_cell("Count"),
    ]);
    apply_table_style(&mut table);
    for facet in facets {
        let values = facet
            .values
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            Cell::new(&facet.field).add_attribute(Attribute::Bold),
            if values.is_empty() {
                dim_cell("(no values)")
            } else {
                Cell::new(values)
            },
            Cell::new(facet.values.len()).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

pub fn listings_table() -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Listing"),
        header_cell("Search fields"),
        header_cell("Facets"),
        header_cell("Grouped by"),
    ]);
    apply_table_style(&mut table);
    for name in PRESET_NAMES {
        let Ok(schema) = ListingSchema::preset(name) else {
            continue;
        };
        let facets = schema
            .facets
            .iter()
            .map(|f| f.field.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            Cell::new(name).fg(Color::Cyan),
            Cell::new(schema.search_fields.join(", ")),
            Cell::new(facets),
            match &schema.partition_field {
                Some(field) => Cell::new(field),
                None => dim_cell("-"),
            },
        ]);
    }
    table
}

pub fn partition_label(key: &str) -> &str {
    if key.is_empty() {
        UNPARTITIONED_LABEL
    } else {
        key
    }
}

/// Page buttons as `1 [2] 3 4 5`, the current page bracketed.
pub fn page_bar(view: &BrowseView<'_>) -> String {
    view.page_buttons
        .iter()
        .map(|&page| {
            if page == view.current_page {
                format!("[{page}]")
            } else {
                page.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Full text rendering of a view.
pub fn render_view(view: &BrowseView<'_>, schema: &ListingSchema) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Listing: {} ({} matching)\n",
        view.listing, view.total_filtered
    ));
    if !view.committed_query.is_empty() {
        out.push_str(&format!("Search: \"{}\"\n", view.committed_query));
    }

    match view.status {
        ViewStatus::Loading => {
            out.push_str("Loading...\n");
            return out;
        }
        ViewStatus::NoData => {
            out.push_str("No records available.\n");
            return out;
        }
        ViewStatus::NoMatches => {
            out.push_str("No records match the current search and filters.\n");
            if view.has_constraints {
                out.push_str("Clear the search and facets to see every record.\n");
            }
            return out;
        }
        ViewStatus::Ready => {}
    }

    match &view.body {
        ViewBody::Flat { records } => {
            out.push_str(&format!("{}\n", record_table(schema, records)));
            out.push_str(&format!(
                "Page {} of {}   {}\n",
                view.current_page,
                view.total_pages,
                page_bar(view)
            ));
        }
        ViewBody::Grouped { partitions } => {
            for partition in partitions {
                render_partition(&mut out, partition, schema);
            }
        }
    }
    out
}

fn render_partition(out: &mut String, partition: &PartitionView<'_>, schema: &ListingSchema) {
    let marker = if partition.expanded { "v" } else { ">" };
    out.push_str(&format!(
        "{marker} {} ({})\n",
        partition_label(&partition.key),
        partition.count
    ));
    if partition.expanded {
        out.push_str(&format!("{}\n", record_table(schema, &partition.records)));
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value.to_string()).fg(Color::DarkGrey)
}
