// One results page
//  └── div.cassetteitem                 RawListingBlock
//       ├── title, label, address, age, structure, image
//       ├── div.cassetteitem_detail-text  access lines (1..n)
//       └── table.cassetteitem_other
//            └── tbody                  RawUnitRow (1..n)

/// One rentable unit as listed inside a building block.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawUnitRow {
    pub floor: String,
    pub rent: String,
    pub management_fee: String,
    pub deposit: String,
    pub key_money: String,
    pub floor_plan: String,
    pub area: String,
    pub detail_url: String,
}

/// One building as it appears on a results page.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawListingBlock {
    pub name: String,
    pub category: String,
    pub address: String,
    pub access_lines: Vec<String>,
    pub age: String,
    pub structure: String,
    pub image_url: String,
    pub units: Vec<RawUnitRow>,
}

/// A block flattened against one access line and one unit row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawListing {
    pub name: String,
    pub category: String,
    pub address: String,
    pub access: String,
    pub age: String,
    pub structure: String,
    pub image_url: String,
    pub unit: RawUnitRow,
}

impl RawListingBlock {
    /// Every access line paired with every unit row: access line outer,
    /// unit row inner. A building near several stations therefore lists each
    /// unit once per station.
    pub fn expand(&self) -> impl Iterator<Item = RawListing> + '_ {
        self.access_lines.iter().flat_map(move |access| {
            self.units.iter().map(move |unit| RawListing {
                name: self.name.clone(),
                category: self.category.clone(),
                address: self.address.clone(),
                access: access.clone(),
                age: self.age.clone(),
                structure: self.structure.clone(),
                image_url: self.image_url.clone(),
                unit: unit.clone(),
            })
        })
    }
}
