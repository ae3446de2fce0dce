use crate::domain::browse::BrowsableListing;
use crate::domain::favorites::Favorites;
use maud::{html, Markup};

fn number(value: Option<f64>) -> String {
    value.map(|v| format!("{v}")).unwrap_or_else(|| "-".to_string())
}

/// Filtered listings with an add-to-favorites button per row.
pub fn listing_table(rows: &[&BrowsableListing], favorites: &Favorites, return_to: &str) -> Markup {
    html! {
        table class="listing-table" {
            thead {
                tr {
                    th { "No" }
                    th { "名称" }
                    th { "市区町村" }
                    th { "築年数(年)" }
                    th { "家賃（円）" }
                    th { "平米数" }
                    th { "徒歩(駅)" }
                    th { "リンク" }
                }
            }
            tbody {
                @for row in rows {
                    tr {
                        td {
                            (row.no)
                            @if favorites.contains(&row.url) {
                                span class="fav-mark" title="お気に入り" { "⭐️" }
                            } @else {
                                form method="post" action="/favorites" class="inline" {
                                    input type="hidden" name="url" value=(row.url);
                                    input type="hidden" name="return_to" value=(return_to);
                                    button type="submit" class="fav-button" title="お気に入りに追加" { "⭐️" }
                                }
                            }
                        }
                        td { (row.name) }
                        td { (row.district) }
                        td { (number(row.age_years)) }
                        td { (number(row.combined_rent)) }
                        td { (number(row.area_m2)) }
                        td { (number(row.walk_minutes)) }
                        td { a href=(row.url) target="_blank" rel="noopener" { "SUUMOで見る" } }
                    }
                }
            }
        }
    }
}
