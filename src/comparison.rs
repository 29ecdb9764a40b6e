//! Comparison Groups
//!
//! A comparison group is the same product tracked at different shops. The
//! group is unit-price comparable only when its measurable members share a
//! single physical dimension.

use serde::Serialize;
use smallvec::SmallVec;

use crate::units::{self, ParsedUnit, UnitKind, resolve_unit};

/// A product as supplied by the tracking layer.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupProduct {
    /// Caller-supplied identifier, echoed back for correlation.
    pub id: String,

    /// Current price for one package.
    pub price: f64,

    /// Structured packaging-unit field, when the shop provides one.
    pub unit: Option<String>,

    /// Free-text product title, used as a fallback unit source.
    pub name: Option<String>,
}

/// The shared dimension of a comparison group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GroupKind {
    /// All measurable members are priced by mass.
    #[serde(rename = "kg")]
    Kilogram,

    /// All measurable members are priced by volume.
    #[serde(rename = "liter")]
    Litre,

    /// No member has a measurable dimension.
    #[serde(rename = "stuk")]
    Piece,

    /// Mass and volume members are mixed; unit prices are meaningless.
    #[serde(rename = "mixed")]
    Mixed,
}

/// Unit price of a single product inside a group result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductUnitPrice {
    /// The caller-supplied product id.
    pub id: String,

    /// Price per canonical unit, `None` when not measurable.
    pub unit_price: Option<f64>,
}

/// Comparability verdict for a group of products.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupUnitInfo {
    /// The dimension shared by the group's measurable members.
    pub common_kind: GroupKind,

    /// Display suffix for the shared dimension, when comparable.
    pub unit_label: Option<&'static str>,

    /// Whether unit prices can be compared across the group.
    pub can_compare: bool,

    /// Per-product unit prices, in input order.
    pub products: Vec<ProductUnitPrice>,
}

/// Decides whether a group of products is unit-price comparable.
///
/// The verdict is driven by the set of measurable dimensions seen across
/// the group: none present → piece-priced, more than one → mixed, exactly
/// one → comparable. Members whose unit does not resolve measurably do not
/// veto a comparable group; they simply carry no unit price.
#[must_use]
pub fn group_unit_info(products: &[GroupProduct]) -> GroupUnitInfo {
    let resolved: Vec<Option<ParsedUnit>> = products
        .iter()
        .map(|product| resolve_unit(product.unit.as_deref(), product.name.as_deref()))
        .collect();

    let mut kinds_seen: SmallVec<[UnitKind; 2]> = SmallVec::new();

    for parsed in resolved.iter().flatten() {
        if parsed.kind.is_measurable() && !kinds_seen.contains(&parsed.kind) {
            kinds_seen.push(parsed.kind);
        }
    }

    match kinds_seen.as_slice() {
        [] => not_comparable(products, GroupKind::Piece),
        [kind] => comparable(products, &resolved, *kind),
        _ => not_comparable(products, GroupKind::Mixed),
    }
}

/// Sort key for unit-price ordering.
///
/// Products without a measurable unit price sort after every comparable
/// product in ascending order.
#[must_use]
pub fn unit_price_for_sort(price: f64, unit: Option<&str>, name: Option<&str>) -> f64 {
    let resolved = resolve_unit(unit, name);

    units::unit_price(price, resolved.as_ref()).unwrap_or(f64::INFINITY)
}

fn not_comparable(products: &[GroupProduct], common_kind: GroupKind) -> GroupUnitInfo {
    GroupUnitInfo {
        common_kind,
        unit_label: None,
        can_compare: false,
        products: products
            .iter()
            .map(|product| ProductUnitPrice {
                id: product.id.clone(),
                unit_price: None,
            })
            .collect(),
    }
}

fn comparable(
    products: &[GroupProduct],
    resolved: &[Option<ParsedUnit>],
    kind: UnitKind,
) -> GroupUnitInfo {
    let products = products
        .iter()
        .zip(resolved)
        .map(|(product, parsed)| ProductUnitPrice {
            id: product.id.clone(),
            unit_price: units::unit_price(product.price, parsed.as_ref()),
        })
        .collect();

    GroupUnitInfo {
        common_kind: common_kind(kind),
        unit_label: kind.label(),
        can_compare: true,
        products,
    }
}

fn common_kind(kind: UnitKind) -> GroupKind {
    match kind {
        UnitKind::Kilogram => GroupKind::Kilogram,
        UnitKind::Litre => GroupKind::Litre,
        UnitKind::Piece | UnitKind::Unknown => GroupKind::Piece,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, price: f64, unit: Option<&str>, name: Option<&str>) -> GroupProduct {
        GroupProduct {
            id: id.to_string(),
            price,
            unit: unit.map(str::to_string),
            name: name.map(str::to_string),
        }
    }

    fn approx(left: f64, right: f64) -> bool {
        (left - right).abs() < 1e-6
    }

    #[test]
    fn all_weight_group_is_comparable_per_kilogram() {
        let info = group_unit_info(&[
            product("1", 20.99, Some("1000g"), None),
            product("2", 11.49, Some("500g"), None),
        ]);

        assert_eq!(info.common_kind, GroupKind::Kilogram);
        assert_eq!(info.unit_label, Some("/kg"));
        assert!(info.can_compare);

        let prices: Vec<Option<f64>> = info
            .products
            .iter()
            .map(|entry| entry.unit_price)
            .collect();

        assert!(matches!(prices.first(), Some(Some(p)) if approx(*p, 20.99)));
        assert!(matches!(prices.get(1), Some(Some(p)) if approx(*p, 22.98)));
    }

    #[test]
    fn mixed_mass_and_volume_group_is_not_comparable() {
        let info = group_unit_info(&[
            product("1", 2.19, Some("500g"), None),
            product("2", 1.89, Some("1L"), None),
        ]);

        assert_eq!(info.common_kind, GroupKind::Mixed);
        assert_eq!(info.unit_label, None);
        assert!(!info.can_compare);
        assert!(info.products.iter().all(|entry| entry.unit_price.is_none()));
    }

    #[test]
    fn group_without_measurable_units_is_piece_priced() {
        let info = group_unit_info(&[
            product("1", 0.99, Some("per stuk"), None),
            product("2", 1.29, None, None),
            product("3", 1.49, Some("tray"), None),
        ]);

        assert_eq!(info.common_kind, GroupKind::Piece);
        assert!(!info.can_compare);
        assert!(info.products.iter().all(|entry| entry.unit_price.is_none()));
    }

    #[test]
    fn one_unresolved_member_does_not_veto_the_group() {
        let info = group_unit_info(&[
            product("1", 3.49, Some("500g"), None),
            product("2", 2.99, Some("zak"), None),
        ]);

        assert_eq!(info.common_kind, GroupKind::Kilogram);
        assert!(info.can_compare);

        assert!(matches!(
            info.products.first(),
            Some(ProductUnitPrice {
                unit_price: Some(_),
                ..
            })
        ));

        assert!(matches!(
            info.products.get(1),
            Some(ProductUnitPrice {
                unit_price: None,
                ..
            })
        ));
    }

    #[test]
    fn name_fallback_feeds_the_group_verdict() {
        let info = group_unit_info(&[
            product("1", 1.99, None, Some("Halfvolle melk 1L")),
            product("2", 2.49, Some("1.5L"), None),
        ]);

        assert_eq!(info.common_kind, GroupKind::Litre);
        assert_eq!(info.unit_label, Some("/L"));
        assert!(info.can_compare);
    }

    #[test]
    fn empty_group_is_piece_priced() {
        let info = group_unit_info(&[]);

        assert_eq!(info.common_kind, GroupKind::Piece);
        assert!(!info.can_compare);
        assert!(info.products.is_empty());
    }

    #[test]
    fn result_ids_follow_input_order() {
        let info = group_unit_info(&[
            product("b", 1.0, Some("100g"), None),
            product("a", 2.0, Some("200g"), None),
        ]);

        let ids: Vec<&str> = info.products.iter().map(|entry| entry.id.as_str()).collect();

        assert_eq!(ids, ["b", "a"]);
    }

    #[test]
    fn sort_key_is_infinite_for_unmeasurable_products() {
        assert_eq!(unit_price_for_sort(2.99, None, None), f64::INFINITY);
        assert_eq!(
            unit_price_for_sort(2.99, Some("per stuk"), None),
            f64::INFINITY
        );
        assert_eq!(
            unit_price_for_sort(2.99, Some("aanbieding"), None),
            f64::INFINITY
        );
    }

    #[test]
    fn sort_key_is_finite_for_measurable_products() {
        let key = unit_price_for_sort(11.49, Some("500g"), None);

        assert!(key.is_finite());
        assert!(approx(key, 22.98));
    }

    #[test]
    fn sort_key_orders_incomparable_products_last() {
        let mut keys = [
            unit_price_for_sort(2.99, Some("per stuk"), None),
            unit_price_for_sort(11.49, Some("500g"), None),
            unit_price_for_sort(20.99, Some("1000g"), None),
        ];

        keys.sort_by(f64::total_cmp);

        assert!(approx(keys[0], 20.99));
        assert!(approx(keys[1], 22.98));
        assert_eq!(keys[2], f64::INFINITY);
    }
}
