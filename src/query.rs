// query.rs
//
// Dashboard form state carried in the query string, so every filter change
// is a plain GET and the page can be reloaded or bookmarked.
use crate::domain::browse::{
    Household, Range, RentPreference, SliderSpec, AGE_SLIDER, AREA_SLIDER, MAX_HOUSEHOLD_SIZE,
    RENT_SLIDER, WALK_SLIDER,
};
use crate::domain::chart::ChartVariable;
use crate::errors::ServerError;
use url::form_urlencoded;

pub const DEFAULT_ANNUAL_INCOME_MAN: u32 = 500;

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardQuery {
    pub district: Option<String>,
    pub rent: Range,
    pub age: Range,
    pub walk: Range,
    pub area: Range,
    pub household: Household,
    pub annual_income_man: u32,
    pub preference: RentPreference,
    pub variables: Vec<ChartVariable>,
    pub compare: bool,
}

impl Default for DashboardQuery {
    fn default() -> Self {
        Self {
            district: None,
            rent: RENT_SLIDER.default,
            age: AGE_SLIDER.default,
            walk: WALK_SLIDER.default,
            area: AREA_SLIDER.default,
            household: Household::default(),
            annual_income_man: DEFAULT_ANNUAL_INCOME_MAN,
            preference: RentPreference::default(),
            variables: ChartVariable::DEFAULT_SELECTION.to_vec(),
            compare: false,
        }
    }
}

pub fn parse_pairs(raw: &str) -> Vec<(String, String)> {
    form_urlencoded::parse(raw.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

fn last<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .rev()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
        .filter(|v| !v.trim().is_empty())
}

pub fn parse_u32(pairs: &[(String, String)], key: &str, default: u32) -> Result<u32, ServerError> {
    match last(pairs, key) {
        None => Ok(default),
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| ServerError::BadRequest(format!("invalid value for {key}: {v:?}"))),
    }
}

fn parse_bound(pairs: &[(String, String)], key: &str, default: f64) -> Result<f64, ServerError> {
    match last(pairs, key) {
        None => Ok(default),
        Some(v) => v
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .ok_or_else(|| ServerError::BadRequest(format!("invalid value for {key}: {v:?}"))),
    }
}

/// `<name>_min` / `<name>_max`, clamped to the slider bounds.
fn parse_range(pairs: &[(String, String)], name: &str, slider: &SliderSpec) -> Result<Range, ServerError> {
    let min = parse_bound(pairs, &format!("{name}_min"), slider.default.min)?;
    let max = parse_bound(pairs, &format!("{name}_max"), slider.default.max)?;
    let min = min.clamp(slider.bounds.min, slider.bounds.max);
    let max = max.clamp(slider.bounds.min, slider.bounds.max);
    if min > max {
        return Err(ServerError::BadRequest(format!(
            "{name}_min must not exceed {name}_max"
        )));
    }
    Ok(Range::new(min, max))
}

fn parse_household(pairs: &[(String, String)]) -> Result<Household, ServerError> {
    let household = Household {
        adults: parse_u32(pairs, "adults", Household::default().adults)?,
        children: parse_u32(pairs, "children", Household::default().children)?,
    };
    if household.size() > MAX_HOUSEHOLD_SIZE {
        return Err(ServerError::BadRequest(format!(
            "household of {} exceeds {MAX_HOUSEHOLD_SIZE} residents",
            household.size()
        )));
    }
    Ok(household)
}

impl DashboardQuery {
    pub fn from_pairs(pairs: &[(String, String)]) -> Result<Self, ServerError> {
        let preference = match last(pairs, "pref") {
            None => RentPreference::default(),
            Some(key) => RentPreference::from_key(key)
                .ok_or_else(|| ServerError::BadRequest(format!("unknown rent preference {key:?}")))?,
        };

        // A submitted form carries `form=1`; only then is an empty
        // variable list meaningful.
        let submitted = last(pairs, "form").is_some();
        let mut variables = Vec::new();
        for (_, key) in pairs.iter().filter(|(k, _)| k == "var") {
            let var = ChartVariable::from_key(key)
                .ok_or_else(|| ServerError::BadRequest(format!("unknown chart variable {key:?}")))?;
            variables.push(var);
        }
        if !submitted && variables.is_empty() {
            variables = ChartVariable::DEFAULT_SELECTION.to_vec();
        }

        Ok(Self {
            district: last(pairs, "district").map(str::to_string),
            rent: parse_range(pairs, "rent", &RENT_SLIDER)?,
            age: parse_range(pairs, "age", &AGE_SLIDER)?,
            walk: parse_range(pairs, "walk", &WALK_SLIDER)?,
            area: parse_range(pairs, "area", &AREA_SLIDER)?,
            household: parse_household(pairs)?,
            annual_income_man: parse_u32(pairs, "income", DEFAULT_ANNUAL_INCOME_MAN)?,
            preference,
            variables,
            compare: last(pairs, "compare").is_some(),
        })
    }
}

/// Only same-site absolute paths are followed after a form post.
pub fn safe_return_path(candidate: Option<&str>) -> &str {
    match candidate {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.starts_with("/\\") => path,
        _ => "/",
    }
}
