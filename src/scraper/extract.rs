// scraper/extract.rs
use crate::scraper::models::{RawListing, RawListingBlock, RawUnitRow};
use crate::scraper::ScraperError;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

pub const SITE_BASE_URL: &str = "https://suumo.jp";

// Positions of the unit-row cells inside each tbody.
const TD_FLOOR: usize = 2;
const TD_RENT_FEE: usize = 3;
const TD_DEPOSIT_KEY: usize = 4;
const TD_PLAN_AREA: usize = 5;
const TD_DETAIL_LINK: usize = 8;

struct Selectors {
    item: Selector,
    title: Selector,
    label: Selector,
    address: Selector,
    col3: Selector,
    div: Selector,
    object_item: Selector,
    img: Selector,
    access: Selector,
    units_table: Selector,
    tbody: Selector,
    td: Selector,
    li: Selector,
    link: Selector,
}

fn sel(css: &str) -> Result<Selector, ScraperError> {
    Selector::parse(css).map_err(|e| ScraperError::HtmlParse(format!("{css}: {e}")))
}

impl Selectors {
    fn new() -> Result<Self, ScraperError> {
        Ok(Self {
            item: sel("div.cassetteitem")?,
            title: sel("div.cassetteitem_content-title")?,
            label: sel("div.cassetteitem_content-label")?,
            address: sel("li.cassetteitem_detail-col1")?,
            col3: sel("li.cassetteitem_detail-col3")?,
            div: sel("div")?,
            object_item: sel("div.cassetteitem_object-item")?,
            img: sel("img")?,
            access: sel("div.cassetteitem_detail-text")?,
            units_table: sel("table.cassetteitem_other")?,
            tbody: sel("tbody")?,
            td: sel("td")?,
            li: sel("li")?,
            link: sel("a")?,
        })
    }
}

fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Reads elements of one block, reporting which one is missing.
struct BlockReader<'a> {
    block: usize,
    sel: &'a Selectors,
}

impl<'a> BlockReader<'a> {
    fn missing(&self, element: impl Into<String>) -> ScraperError {
        ScraperError::MissingElement {
            block: self.block,
            element: element.into(),
        }
    }

    fn first<'e>(
        &self,
        scope: ElementRef<'e>,
        selector: &Selector,
        name: &str,
    ) -> Result<ElementRef<'e>, ScraperError> {
        scope.select(selector).next().ok_or_else(|| self.missing(name))
    }

    fn nth<'e>(
        &self,
        scope: ElementRef<'e>,
        selector: &Selector,
        index: usize,
        name: &str,
    ) -> Result<ElementRef<'e>, ScraperError> {
        scope
            .select(selector)
            .nth(index)
            .ok_or_else(|| self.missing(format!("{name}[{index}]")))
    }

    fn image_url(&self, item: ElementRef<'_>) -> String {
        item.select(&self.sel.object_item)
            .next()
            .and_then(|obj| obj.select(&self.sel.img).next())
            .and_then(|img| img.value().attr("rel").or_else(|| img.value().attr("src")))
            .unwrap_or("")
            .to_string()
    }

    fn unit_row(&self, tbody: ElementRef<'_>, base: &Url) -> Result<RawUnitRow, ScraperError> {
        let s = self.sel;
        let tds: Vec<ElementRef<'_>> = tbody.select(&s.td).collect();
        let td = |i: usize| tds.get(i).copied().ok_or_else(|| self.missing(format!("td[{i}]")));

        let rent_fee = td(TD_RENT_FEE)?;
        let deposit_key = td(TD_DEPOSIT_KEY)?;
        let plan_area = td(TD_PLAN_AREA)?;

        let href = self
            .first(td(TD_DETAIL_LINK)?, &s.link, "detail link")?
            .value()
            .attr("href")
            .ok_or_else(|| self.missing("detail link href"))?;
        let detail_url = base
            .join(href)
            .map_err(|e| ScraperError::HtmlParse(format!("detail link {href:?}: {e}")))?;

        Ok(RawUnitRow {
            floor: text_of(td(TD_FLOOR)?),
            rent: text_of(self.nth(rent_fee, &s.li, 0, "rent li")?),
            management_fee: text_of(self.nth(rent_fee, &s.li, 1, "fee li")?),
            deposit: text_of(self.nth(deposit_key, &s.li, 0, "deposit li")?),
            key_money: text_of(self.nth(deposit_key, &s.li, 1, "key money li")?),
            floor_plan: text_of(self.nth(plan_area, &s.li, 0, "floor plan li")?),
            area: text_of(self.nth(plan_area, &s.li, 1, "area li")?),
            detail_url: detail_url.to_string(),
        })
    }

    fn block(&self, item: ElementRef<'_>, base: &Url) -> Result<RawListingBlock, ScraperError> {
        let s = self.sel;
        let col3 = self.first(item, &s.col3, "li.cassetteitem_detail-col3")?;
        let table = self.first(item, &s.units_table, "table.cassetteitem_other")?;

        let units = table
            .select(&s.tbody)
            .map(|tbody| self.unit_row(tbody, base))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RawListingBlock {
            name: text_of(self.first(item, &s.title, "div.cassetteitem_content-title")?),
            category: text_of(self.first(item, &s.label, "div.cassetteitem_content-label")?),
            address: text_of(self.first(item, &s.address, "li.cassetteitem_detail-col1")?),
            access_lines: item.select(&s.access).map(text_of).collect(),
            age: text_of(self.nth(col3, &s.div, 0, "detail-col3 div")?),
            structure: text_of(self.nth(col3, &s.div, 1, "detail-col3 div")?),
            image_url: self.image_url(item),
            units,
        })
    }
}

/// All building blocks on one results page, in page order.
///
/// Blocks without any access line produce no listings and are skipped
/// without being read further.
pub fn extract_blocks(html: &str) -> Result<Vec<RawListingBlock>, ScraperError> {
    let selectors = Selectors::new()?;
    let base = Url::parse(SITE_BASE_URL).map_err(|e| ScraperError::HtmlParse(e.to_string()))?;
    let document = Html::parse_document(html);

    let mut blocks = Vec::new();
    for (i, item) in document.select(&selectors.item).enumerate() {
        let reader = BlockReader {
            block: i + 1,
            sel: &selectors,
        };
        if item.select(&selectors.access).next().is_none() {
            debug!(block = i + 1, "block has no access lines, skipping");
            continue;
        }
        blocks.push(reader.block(item, &base)?);
    }
    Ok(blocks)
}

/// One raw listing per (access line, unit row) of every block.
pub fn extract_listings(html: &str) -> Result<Vec<RawListing>, ScraperError> {
    Ok(extract_blocks(html)?
        .iter()
        .flat_map(RawListingBlock::expand)
        .collect())
}
