//! Report
//!
//! Renders a comparison group as a terminal table, one row per shop, with
//! the cheapest comparable offer highlighted.

use std::io;

use smallvec::SmallVec;
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    catalog::{Catalog, CatalogProduct},
    comparison::{GroupKind, GroupUnitInfo, group_unit_info},
    display::{format_price, format_unit_price},
    mechanisms::calculate_bonus_deal,
    units::UnitKind,
};

/// Errors that can occur while writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// IO error writing the table.
    #[error("IO error")]
    Io,
}

/// Writes a comparison table for the catalog's products.
///
/// # Errors
///
/// Returns [`ReportError::Io`] if the table cannot be written.
pub fn write_comparison(mut out: impl io::Write, catalog: &Catalog) -> Result<(), ReportError> {
    let info = group_unit_info(&catalog.comparison_products());

    let mut builder = Builder::default();

    builder.push_record([
        "Store",
        "Product",
        "Shelf Price",
        "Bonus",
        "Effective",
        "Unit Price",
    ]);

    let cheapest = cheapest_row(&info);
    let mut color_ops: SmallVec<[(usize, usize, Color); 8]> = SmallVec::new();

    for (row, product) in catalog.products.iter().enumerate() {
        builder.push_record(product_record(product, &info, row));

        if Some(row) == cheapest {
            // Header is row 0.
            color_ops.push((row + 1, 5, Color::FG_GREEN));
        }
    }

    write_table(&mut out, builder, color_ops)?;
    write_summary(&mut out, &info)
}

/// Cell contents for a single product row.
fn product_record(product: &CatalogProduct, info: &GroupUnitInfo, row: usize) -> [String; 6] {
    let savings = product
        .mechanism
        .as_deref()
        .and_then(|mechanism| calculate_bonus_deal(mechanism, product.price))
        .map(|deal| format!("{} (-{:.1}%)", mechanism_text(product), deal.savings_percent))
        .unwrap_or_default();

    let unit_price_cell = info
        .products
        .get(row)
        .and_then(|entry| format_unit_price(entry.unit_price, measurable_kind(info)))
        .unwrap_or_default();

    [
        product.store.clone().unwrap_or_default(),
        product.name.clone(),
        format_price(product.price).unwrap_or_default(),
        savings,
        format_price(product.effective_price()).unwrap_or_default(),
        unit_price_cell,
    ]
}

fn mechanism_text(product: &CatalogProduct) -> &str {
    product.mechanism.as_deref().unwrap_or_default()
}

/// Index of the comparable product with the lowest unit price.
fn cheapest_row(info: &GroupUnitInfo) -> Option<usize> {
    if !info.can_compare {
        return None;
    }

    info.products
        .iter()
        .enumerate()
        .filter_map(|(idx, entry)| entry.unit_price.map(|price| (idx, price)))
        .min_by(|(_, left), (_, right)| left.total_cmp(right))
        .map(|(idx, _)| idx)
}

/// The unit kind prices are formatted in, when the group is comparable.
fn measurable_kind(info: &GroupUnitInfo) -> UnitKind {
    match info.common_kind {
        GroupKind::Kilogram => UnitKind::Kilogram,
        GroupKind::Litre => UnitKind::Litre,
        GroupKind::Piece | GroupKind::Mixed => UnitKind::Unknown,
    }
}

fn write_table(
    out: &mut impl io::Write,
    builder: Builder,
    color_ops: SmallVec<[(usize, usize, Color); 8]>,
) -> Result<(), ReportError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(2..6), Alignment::right());

    for (row, col, color) in color_ops {
        table.modify((row, col), color);
    }

    writeln!(out, "{table}").map_err(|_err| ReportError::Io)
}

fn write_summary(out: &mut impl io::Write, info: &GroupUnitInfo) -> Result<(), ReportError> {
    let line = match info.common_kind {
        GroupKind::Kilogram => "Comparing per kilogram.",
        GroupKind::Litre => "Comparing per litre.",
        GroupKind::Piece => "No measurable units; prices are per piece.",
        GroupKind::Mixed => "Mixed weight and volume units; unit prices are not comparable.",
    };

    writeln!(out, " {line}").map_err(|_err| ReportError::Io)
}
