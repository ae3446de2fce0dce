use crate::db::scrapes::ScrapeRun;
use crate::templates::desktop_layout;
use chrono::DateTime;
use maud::{html, Markup};

fn timestamp(secs: i64) -> String {
    DateTime::from_timestamp(secs, 0)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| secs.to_string())
}

pub fn runs_page(runs: &[ScrapeRun]) -> Markup {
    desktop_layout(
        "取得履歴",
        html! {
            main class="container" {
                h1 { "取得履歴" }
                @if runs.is_empty() {
                    p class="muted" { "まだ取得が実行されていません" }
                } @else {
                    table class="listing-table" {
                        thead {
                            tr {
                                th { "ID" }
                                th { "保存先" }
                                th { "開始" }
                                th { "終了" }
                                th { "ページ数" }
                                th { "件数" }
                                th { "結果" }
                            }
                        }
                        tbody {
                            @for run in runs {
                                tr {
                                    td { (run.id) }
                                    td { (run.target) }
                                    td { (timestamp(run.started_at)) }
                                    td { @if let Some(t) = run.finished_at { (timestamp(t)) } @else { "-" } }
                                    td { (run.pages_fetched.unwrap_or(0)) }
                                    td { (run.listings_written.unwrap_or(0)) }
                                    td {
                                        @if run.success {
                                            span class="ok" { "成功" }
                                        } @else if let Some(msg) = &run.error_message {
                                            span class="failed" title=(msg) { "失敗" }
                                        } @else {
                                            span class="muted" { "実行中" }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}
