use crate::domain::browse::{BrowsableListing, BrowseError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartVariable {
    Rent,
    Area,
    Walk,
    Age,
}

impl ChartVariable {
    pub const ALL: [ChartVariable; 4] = [Self::Rent, Self::Area, Self::Walk, Self::Age];
    pub const DEFAULT_SELECTION: [ChartVariable; 2] = [Self::Rent, Self::Area];

    pub fn label(self) -> &'static str {
        match self {
            Self::Rent => "家賃（円）",
            Self::Area => "平米数",
            Self::Walk => "徒歩(駅)",
            Self::Age => "築年数(年)",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::Rent => "rent",
            Self::Area => "area",
            Self::Walk => "walk",
            Self::Age => "age",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.key() == key)
    }

    pub fn value(self, row: &BrowsableListing) -> Option<f64> {
        match self {
            Self::Rent => row.combined_rent,
            Self::Area => row.area_m2,
            Self::Walk => row.walk_minutes,
            Self::Age => row.age_years,
        }
    }
}

/// Selected variables mapped onto axes in x, y, color, size order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartSpec {
    pub x: ChartVariable,
    pub y: ChartVariable,
    pub color: Option<ChartVariable>,
    pub size: Option<ChartVariable>,
}

impl ChartSpec {
    /// Repeated selections count once.
    pub fn from_selection(selected: &[ChartVariable]) -> Result<Self, BrowseError> {
        let mut unique: Vec<ChartVariable> = Vec::with_capacity(4);
        for v in selected {
            if !unique.contains(v) {
                unique.push(*v);
            }
        }

        match unique.as_slice() {
            [x, y] => Ok(Self { x: *x, y: *y, color: None, size: None }),
            [x, y, c] => Ok(Self { x: *x, y: *y, color: Some(*c), size: None }),
            [x, y, c, s] => Ok(Self { x: *x, y: *y, color: Some(*c), size: Some(*s) }),
            few if few.len() < 2 => Err(BrowseError::TooFewChartVariables(few.len())),
            many => Err(BrowseError::TooManyChartVariables(many.len())),
        }
    }

    pub fn variables(&self) -> Vec<ChartVariable> {
        [Some(self.x), Some(self.y), self.color, self.size]
            .into_iter()
            .flatten()
            .collect()
    }
}
