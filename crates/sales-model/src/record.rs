use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One sold line item after validation.
///
/// `region`, `subregion` and `product_name` are never empty; `order_date` is always resolved.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub region: String,
    /// State or province.
    pub subregion: String,
    pub product_name: String,
    pub sales: f64,
    pub profit: f64,
    pub order_date: NaiveDate,
    pub ship_date: Option<NaiveDate>,
}

impl OrderRecord {
    pub fn new(
        region: impl Into<String>,
        subregion: impl Into<String>,
        product_name: impl Into<String>,
        sales: f64,
        profit: f64,
        order_date: NaiveDate,
    ) -> Self {
        Self {
            region: region.into(),
            subregion: subregion.into(),
            product_name: product_name.into(),
            sales,
            profit,
            order_date,
            ship_date: None,
        }
    }

    pub fn with_ship_date(mut self, ship_date: NaiveDate) -> Self {
        self.ship_date = Some(ship_date);
        self
    }
}

/// The loaded order snapshot. Immutable once built; filters only ever borrow from it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
    records: Vec<OrderRecord>,
}

impl Dataset {
    pub fn new(records: Vec<OrderRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[OrderRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OrderRecord> {
        self.records.iter()
    }
}

impl FromIterator<OrderRecord> for Dataset {
    fn from_iter<I: IntoIterator<Item = OrderRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a OrderRecord;
    type IntoIter = std::slice::Iter<'a, OrderRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
