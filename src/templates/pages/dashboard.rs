use crate::domain::browse::{
    district_rent_estimate, monthly_rent_budget, BrowsableListing, BrowseError, Range,
    RentPreference, SliderSpec, AGE_SLIDER, AREA_SLIDER, MAX_HOUSEHOLD_SIZE, RENT_SLIDER,
    WALK_SLIDER,
};
use crate::domain::chart::{ChartSpec, ChartVariable};
use crate::domain::favorites::Favorites;
use crate::query::DashboardQuery;
use crate::templates::components::{listing_table, scatter_chart};
use crate::templates::{card, desktop_layout, error_banner};
use maud::{html, Markup};

pub struct DashboardVm<'a> {
    pub query: &'a DashboardQuery,
    pub districts: Vec<&'a str>,
    pub selected_district: Option<&'a str>,
    pub matches: Vec<&'a BrowsableListing>,
    /// `None` until the compare button is pressed.
    pub chart: Option<Result<ChartSpec, BrowseError>>,
    pub favorites: &'a Favorites,
    pub favorite_rows: Vec<&'a BrowsableListing>,
    /// Path + query of this page, for forms that post and come back.
    pub return_to: &'a str,
}

/// The stored table could not be loaded; nothing else is rendered.
pub fn dashboard_error_page(err: &BrowseError) -> Markup {
    desktop_layout(
        "物件を探す",
        html! {
            main class="container" {
                h1 { "Opti Home" }
                (error_banner(&err.to_string()))
            }
        },
    )
}

pub fn dashboard_page(vm: &DashboardVm) -> Markup {
    desktop_layout(
        "物件を探す",
        html! {
            div class="layout" {
                aside class="sidebar" {
                    form method="get" action="/" {
                        input type="hidden" name="form" value="1";
                        (concierge_card(vm))
                        (search_card(vm))
                        button type="submit" name="compare" value="1" class="primary" { "比較" }
                    }
                }
                main class="container" {
                    h1 { "Opti Home" }
                    @if let Some(chart) = &vm.chart {
                        (results(vm, chart))
                    } @else {
                        p class="muted" {
                            "条件に合う物件: " strong { (vm.matches.len()) } " 件。"
                            "「比較」を押すとグラフと一覧を表示します。"
                        }
                    }
                    @if !vm.favorite_rows.is_empty() {
                        section class="card" id="favorites" {
                            h2 { "お気に入りリスト:" }
                            (listing_table(&vm.favorite_rows, vm.favorites, vm.return_to))
                        }
                    }
                }
            }
        },
    )
}

fn concierge_card(vm: &DashboardVm) -> Markup {
    let q = vm.query;
    let space = q.household.minimum_living_space();
    let budget = monthly_rent_budget(q.annual_income_man, q.preference);
    let estimate = vm
        .selected_district
        .and_then(|d| district_rent_estimate(d, space).map(|rent| (d, rent)));

    card(
        "コンシェルジュサービス",
        html! {
            label { "大人の人数を入力してください:"
                input type="number" name="adults" min="0" max=(MAX_HOUSEHOLD_SIZE) value=(q.household.adults);
            }
            label { "子供の人数を入力してください:"
                input type="number" name="children" min="0" max=(MAX_HOUSEHOLD_SIZE) value=(q.household.children);
            }
            label { "年収を入力してください（万円）:"
                input type="number" name="income" min="0" value=(q.annual_income_man);
            }
            label { "家賃にどれくらいお金をかけますか？"
                select name="pref" {
                    @for pref in RentPreference::ALL {
                        option value=(pref.key()) selected[pref == q.preference] { (pref.label()) }
                    }
                }
            }
            label { "市区町村を選択してください:"
                select name="district" {
                    @for district in &vm.districts {
                        option value=(district) selected[Some(*district) == vm.selected_district] { (district) }
                    }
                }
            }
            div class="advice" {
                @match estimate {
                    Some((district, rent)) => p { (district) "の最低居住スペースにおける家賃相場: " strong { (rent) " 円" } },
                    None => p { "選択された区の家賃相場データがありません" },
                }
                p { "月額家賃の目安: " strong { (format!("{budget:.0}")) " 円" } }
                p { "最低居住スペース: " strong { (space) } " 平米" }
            }
        },
    )
}

fn range_inputs(label: &str, name: &str, slider: &SliderSpec, value: Range) -> Markup {
    html! {
        fieldset class="range" {
            legend { (label) }
            input type="number" name=(format!("{name}_min"))
                min=(slider.bounds.min) max=(slider.bounds.max) step=(slider.step) value=(value.min);
            " 〜 "
            input type="number" name=(format!("{name}_max"))
                min=(slider.bounds.min) max=(slider.bounds.max) step=(slider.step) value=(value.max);
        }
    }
}

fn search_card(vm: &DashboardVm) -> Markup {
    let q = vm.query;
    card(
        "詳細検索",
        html! {
            (range_inputs("家賃範囲を選択してください", "rent", &RENT_SLIDER, q.rent))
            (range_inputs("築年数の範囲を選択してください", "age", &AGE_SLIDER, q.age))
            (range_inputs("駅からの徒歩時間（分）を選択してください", "walk", &WALK_SLIDER, q.walk))
            (range_inputs("面積の範囲を選択してください（平米）", "area", &AREA_SLIDER, q.area))
            fieldset {
                legend { "比較したい項目を選択してください。（2つ以上選択）:" }
                @for var in ChartVariable::ALL {
                    label class="inline" {
                        input type="checkbox" name="var" value=(var.key()) checked[q.variables.contains(&var)];
                        (var.label())
                    }
                }
            }
        },
    )
}

fn results(vm: &DashboardVm, chart: &Result<ChartSpec, BrowseError>) -> Markup {
    match chart {
        Err(err) => error_banner(&err.to_string()),
        Ok(spec) => html! {
            (scatter_chart(spec, &vm.matches))
            h2 { "対象物件リスト:" }
            @if vm.matches.is_empty() {
                p class="muted" { "条件に合う物件がありません" }
            } @else {
                (listing_table(&vm.matches, vm.favorites, vm.return_to))
            }
        },
    }
}
