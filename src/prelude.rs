//! Schapkaart prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    catalog::{Catalog, CatalogError, CatalogProduct},
    comparison::{
        GroupKind, GroupProduct, GroupUnitInfo, ProductUnitPrice, group_unit_info,
        unit_price_for_sort,
    },
    display::{format_price, format_unit_price, unit_price_display},
    locale::parse_decimal,
    mechanisms::{BonusDeal, BonusMechanism, MechanismError, calculate_bonus_deal},
    report::{ReportError, write_comparison},
    units::{ParsedUnit, UnitKind, parse_unit, resolve_unit, unit_price},
};
