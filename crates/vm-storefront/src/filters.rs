//! Catalog filter state and the sort select's `<field>_<order>` values.

use std::fmt;
use std::str::FromStr;

use vm_api_types::{ItemQuery, SortField, SortOrder};

use crate::format::parse_leading_int;

pub const DEFAULT_PER_PAGE: u32 = 12;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortOption {
    pub field: SortField,
    pub order: SortOrder,
}

impl SortOption {
    pub const fn new(field: SortField, order: SortOrder) -> Self {
        Self { field, order }
    }
}

/// Splits on the last underscore so `created_at_desc` keeps its field name.
impl FromStr for SortOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, order) = s
            .rsplit_once('_')
            .ok_or_else(|| format!("sort value '{s}' has no order suffix"))?;
        Ok(Self {
            field: field.parse()?,
            order: order.parse()?,
        })
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.field.as_str(), self.order.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub page: u32,
    pub per_page: u32,
    pub sort: SortOption,
    pub category_ids: Vec<u64>,
    pub brand_ids: Vec<u64>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub in_stock: bool,
    pub search: Option<String>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
            sort: SortOption::default(),
            category_ids: Vec::new(),
            brand_ids: Vec::new(),
            min_price: None,
            max_price: None,
            in_stock: false,
            search: None,
        }
    }
}

impl FilterState {
    pub fn set_sort(&mut self, sort: SortOption) {
        self.sort = sort;
        self.page = 1;
    }

    pub fn set_selection(&mut self, category_ids: Vec<u64>, brand_ids: Vec<u64>, in_stock: bool) {
        self.category_ids = category_ids;
        self.brand_ids = brand_ids;
        self.in_stock = in_stock;
        self.page = 1;
    }

    /// Store price bounds from raw input text. Text without a leading number,
    /// or a zero, clears the bound.
    pub fn set_price(&mut self, min: &str, max: &str) {
        self.min_price = price_bound(min);
        self.max_price = price_bound(max);
    }

    pub fn to_query(&self) -> ItemQuery {
        ItemQuery {
            page: Some(self.page),
            per_page: Some(self.per_page),
            sort_by: Some(self.sort.field),
            sort_order: Some(self.sort.order),
            category_ids: self.category_ids.clone(),
            brand_ids: self.brand_ids.clone(),
            min_price: self.min_price,
            max_price: self.max_price,
            in_stock: self.in_stock.then_some(true),
            exclude: None,
            search: self.search.clone(),
        }
    }
}

fn price_bound(raw: &str) -> Option<i64> {
    parse_leading_int(raw).filter(|value| *value != 0)
}
